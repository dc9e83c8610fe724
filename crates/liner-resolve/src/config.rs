use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use liner_core::provenance::{default_source_priority, SourceRanking};
use liner_core::taxonomy::RoleTaxonomy;

use crate::error::{ResolveError, ResolveResult};

/// Configuration for liner.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (LINER_* prefix)
/// 3. Config file (~/.config/liner/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Parsed credits scoring below this are dropped at assembly.
    ///
    /// Can be set via:
    /// - ENV: LINER_CONFIDENCE_THRESHOLD
    /// - Config: confidence_threshold = 0.5
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Minimum token-Jaccard similarity for two differing role strings to
    /// count as the same role.
    #[serde(default = "default_role_similarity_threshold")]
    pub role_similarity_threshold: f64,

    /// Minimum string similarity for two differing names to count as the
    /// same person.
    #[serde(default = "default_name_similarity_threshold")]
    pub name_similarity_threshold: f64,

    /// Confidence added per additional corroborating source.
    #[serde(default = "default_corroboration_bonus")]
    pub corroboration_bonus: f64,

    /// Source name to reliability rank (higher wins ties).
    #[serde(default = "default_source_priority")]
    pub source_priority: HashMap<String, u32>,

    /// Optional TOML role table replacing the built-in taxonomy.
    ///
    /// Can be set via:
    /// - ENV: LINER_TAXONOMY_PATH
    /// - Config: taxonomy_path = "/path/to/roles.toml"
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    /// Logger options handed to twyg by the CLI.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            role_similarity_threshold: default_role_similarity_threshold(),
            name_similarity_threshold: default_name_similarity_threshold(),
            corroboration_bonus: default_corroboration_bonus(),
            source_priority: default_source_priority(),
            taxonomy_path: None,
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/liner/config.toml
    /// Reads environment variables with LINER_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("liner");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, then override the taxonomy path.
    ///
    /// This is used when the --taxonomy CLI flag is provided.
    pub fn load_with_taxonomy_path(path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.taxonomy_path = Some(path);
        Ok(config)
    }

    /// Check that every threshold lies in `[0, 1]`.
    pub fn validate(&self) -> ResolveResult<()> {
        let unit_fields = [
            ("confidence_threshold", self.confidence_threshold),
            ("role_similarity_threshold", self.role_similarity_threshold),
            ("name_similarity_threshold", self.name_similarity_threshold),
            ("corroboration_bonus", self.corroboration_bonus),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ResolveError::Config {
                    field,
                    message: format!("must be within [0, 1], got {}", value),
                });
            }
        }
        Ok(())
    }

    /// The reliability ranking built from `source_priority`.
    pub fn ranking(&self) -> SourceRanking {
        SourceRanking::new(self.source_priority.clone())
    }

    /// Load the configured taxonomy, or the built-in one when no path is
    /// set.
    pub fn load_taxonomy(&self) -> ResolveResult<RoleTaxonomy> {
        let taxonomy = match &self.taxonomy_path {
            Some(path) => {
                log::info!("Loading role taxonomy from {}", path.display());
                RoleTaxonomy::load(path)?
            }
            None => RoleTaxonomy::builtin()?,
        };
        Ok(taxonomy)
    }
}

fn default_confidence_threshold() -> f64 {
    0.5
}

fn default_role_similarity_threshold() -> f64 {
    0.8
}

fn default_name_similarity_threshold() -> f64 {
    0.85
}

fn default_corroboration_bonus() -> f64 {
    0.05
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/liner/config.toml
/// - macOS: ~/Library/Application Support/liner/config.toml
/// - Windows: %APPDATA%\liner\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liner")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Liner Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (LINER_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Parsed credits scoring below this are dropped.
# Can also be set via: LINER_CONFIDENCE_THRESHOLD=0.6
confidence_threshold = 0.5

# Two role strings with token overlap at or above this are the same role.
role_similarity_threshold = 0.8

# Two names at or above this similarity are the same person.
name_similarity_threshold = 0.85

# Confidence added per additional source that agrees on a credit.
corroboration_bonus = 0.05

# Custom role taxonomy (TOML, [[roles]] tables). Built-in table if unset.
#taxonomy_path = "/path/to/roles.toml"

# Reliability ranking used to break ties between sources. Higher wins.
[source_priority]
rapedia = 10
discogs = 8
genius_web = 6
genius_api = 5
spotify = 3
lastfm = 2
manual = 1
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
