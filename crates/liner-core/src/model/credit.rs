use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::provenance::SourceId;
use crate::taxonomy::RoleCategory;

/// Longest person name (in characters) a credit may carry.
pub const MAX_NAME_LEN: usize = 50;

/// Clamp to `[0, 1]`; NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One person in one role, as extracted from a single source.
///
/// Parsed credits are never mutated after assembly; deduplication and
/// cross-source merging build new records instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCredit {
    pub person_name: String,

    /// The role text as it appeared in the source ("Prod. by").
    pub raw_role_text: String,

    /// Canonical taxonomy role, or "Other".
    pub normalized_role: String,

    pub category: RoleCategory,

    /// More than one name was extracted from the same role fragment.
    pub is_collaboration: bool,

    pub source: SourceId,

    pub track_scope: Option<String>,

    /// Parse confidence in `[0, 1]`.
    pub confidence: f64,

    /// Position of the role fragment this credit came from within the batch
    /// it was parsed in.
    #[serde(default)]
    pub fragment_index: usize,
}

impl ParsedCredit {
    /// Create a credit with confidence 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when `person_name` is blank or longer
    /// than [`MAX_NAME_LEN`] characters.
    pub fn new(
        person_name: impl Into<String>,
        raw_role_text: impl Into<String>,
        normalized_role: impl Into<String>,
        category: RoleCategory,
        source: SourceId,
    ) -> Result<Self> {
        let person_name = person_name.into();
        let len = person_name.trim().chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(Error::InvalidData(format!(
                "person name must be 1-{} characters, got {:?}",
                MAX_NAME_LEN, person_name
            )));
        }
        Ok(Self {
            person_name,
            raw_role_text: raw_role_text.into(),
            normalized_role: normalized_role.into(),
            category,
            is_collaboration: false,
            source,
            track_scope: None,
            confidence: 1.0,
            fragment_index: 0,
        })
    }

    /// Set the confidence, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    #[must_use]
    pub fn with_collaboration(mut self, is_collaboration: bool) -> Self {
        self.is_collaboration = is_collaboration;
        self
    }

    #[must_use]
    pub fn with_track_scope(mut self, scope: Option<String>) -> Self {
        self.track_scope = scope;
        self
    }

    #[must_use]
    pub fn with_fragment_index(mut self, index: usize) -> Self {
        self.fragment_index = index;
        self
    }
}

/// The cross-source merged representation of one real-world contribution.
///
/// Provenance is kept by value: the set of sources that reported it and how
/// many parsed credits were folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCredit {
    pub person_name: String,
    pub normalized_role: String,
    pub category: RoleCategory,
    pub supporting_sources: BTreeSet<SourceId>,
    /// Number of parsed credits summarized here; always at least 1.
    pub merged_from_count: usize,
    pub confidence: f64,
}

impl CanonicalCredit {
    /// Seed a canonical credit from the parsed credit that represents it.
    ///
    /// `merged_from_count` is raised to 1 if 0 is passed.
    #[must_use]
    pub fn from_parsed(credit: &ParsedCredit, merged_from_count: usize) -> Self {
        Self {
            person_name: credit.person_name.clone(),
            normalized_role: credit.normalized_role.clone(),
            category: credit.category,
            supporting_sources: BTreeSet::from([credit.source]),
            merged_from_count: merged_from_count.max(1),
            confidence: clamp_unit(credit.confidence),
        }
    }

    /// Set the confidence, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    pub fn source_count(&self) -> usize {
        self.supporting_sources.len()
    }
}

/// The resolved credits of one track, as handed to caches and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub track_ref: String,
    pub credits: Vec<CanonicalCredit>,
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    #[must_use]
    pub fn new(track_ref: impl Into<String>, credits: Vec<CanonicalCredit>) -> Self {
        Self {
            track_ref: track_ref.into(),
            credits,
            resolved_at: Utc::now(),
        }
    }
}
