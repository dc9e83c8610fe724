//! Batch-level collaboration analysis over parsed credits.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use liner_core::model::ParsedCredit;
use liner_core::normalize::normalize;
use liner_core::taxonomy::builtin::FEATURED_ARTIST;
use liner_core::taxonomy::RoleCategory;

/// Aggregate collaboration facts for one batch of credits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationReport {
    /// Role fragments that yielded more than one name.
    pub collaborative_fragments: usize,
    /// Credits flagged `is_collaboration`.
    pub collaborative_credits: usize,
    pub total_credits: usize,
    /// Canonical roles that appeared in a collaborative fragment.
    pub collaborative_roles: BTreeSet<String>,
    /// Distinct featured artists, ordered by normalized name.
    pub featured_artists: Vec<String>,
    /// More than one Production-category credit exists.
    pub multiple_producers: bool,
    /// `collaborative_credits / total_credits`, 0 for an empty batch.
    pub collaboration_score: f64,
}

impl CollaborationReport {
    /// Analyze a batch. Inputs are not modified.
    pub fn analyze(credits: &[ParsedCredit]) -> Self {
        let mut fragments = BTreeSet::new();
        let mut roles = BTreeSet::new();
        let mut featured: BTreeMap<String, String> = BTreeMap::new();
        let mut collaborative_credits = 0;
        let mut producers = 0;

        for credit in credits {
            if credit.is_collaboration {
                collaborative_credits += 1;
                fragments.insert((credit.source, credit.fragment_index));
                roles.insert(credit.normalized_role.clone());
            }
            if credit.category == RoleCategory::Production {
                producers += 1;
            }
            if credit.category == RoleCategory::Performance
                && credit.normalized_role == FEATURED_ARTIST
            {
                featured
                    .entry(normalize(&credit.person_name))
                    .or_insert_with(|| credit.person_name.clone());
            }
        }

        let collaboration_score = if credits.is_empty() {
            0.0
        } else {
            collaborative_credits as f64 / credits.len() as f64
        };

        Self {
            collaborative_fragments: fragments.len(),
            collaborative_credits,
            total_credits: credits.len(),
            collaborative_roles: roles,
            featured_artists: featured.into_values().collect(),
            multiple_producers: producers > 1,
            collaboration_score,
        }
    }
}
