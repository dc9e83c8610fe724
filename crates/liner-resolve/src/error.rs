//! Error types for the resolution engine.

use thiserror::Error;

/// Errors surfaced by the engine. Data-quality problems never appear here:
/// they are absorbed by confidence scoring and filtering.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A taxonomy or model error from the core crate.
    #[error("core error: {0}")]
    Core(#[from] liner_core::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {field}: {message}")]
    Config { field: &'static str, message: String },

    /// A detector or splitter pattern failed to compile.
    #[error("invalid pattern {name}: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A credit source could not deliver its records.
    #[error("fetch error from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },
}

impl ResolveError {
    /// Returns `true` for failures of external collaborators, which the
    /// engine logs and skips instead of propagating.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Convenience alias for engine results.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Compile a regex, tagging failures with a pattern name.
pub(crate) fn compile(name: &'static str, pattern: &str) -> ResolveResult<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| ResolveError::Pattern { name, source })
}
