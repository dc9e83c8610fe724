use serde::{Deserialize, Serialize};

use crate::provenance::SourceId;

/// A raw credit mention as delivered by a scraper or API client.
///
/// One blob may describe several credits ("Produced by X, Mixed by Y").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCreditBlob {
    pub text: String,
    pub source: SourceId,
    /// Which part of a release this blob applies to (e.g., a track title
    /// on an album-level credits page).
    #[serde(default)]
    pub track_scope_hint: Option<String>,
}

impl RawCreditBlob {
    #[must_use]
    pub fn new(text: impl Into<String>, source: SourceId) -> Self {
        Self {
            text: text.into(),
            source,
            track_scope_hint: None,
        }
    }

    #[must_use]
    pub fn with_track_scope(mut self, scope: impl Into<String>) -> Self {
        self.track_scope_hint = Some(scope.into());
        self
    }

    /// `true` when the text holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A name + role record from a structured API payload (e.g., a Discogs
/// `extraartists` entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredCredit {
    pub name: String,
    pub role: String,
}

impl StructuredCredit {
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Everything a source adapter can hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRecord {
    /// Free text, possibly extracted from an HTML fragment.
    Text(RawCreditBlob),
    /// Already separated name/role pairs.
    Structured {
        source: SourceId,
        entries: Vec<StructuredCredit>,
        #[serde(default)]
        track_scope_hint: Option<String>,
    },
}

impl SourceRecord {
    pub fn source(&self) -> SourceId {
        match self {
            Self::Text(blob) => blob.source,
            Self::Structured { source, .. } => *source,
        }
    }
}

impl From<RawCreditBlob> for SourceRecord {
    fn from(blob: RawCreditBlob) -> Self {
        Self::Text(blob)
    }
}
