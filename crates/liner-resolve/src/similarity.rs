//! The credit equivalence rule used by intra-source deduplication and
//! cross-source matching.
//!
//! Two credits are equivalent when their roles agree (identical canonical
//! role, or token-Jaccard similarity at or above the role threshold) and
//! their names agree (identical after normalization, or string similarity
//! at or above the name threshold).

use std::collections::BTreeSet;

use liner_core::model::ParsedCredit;
use liner_core::normalize::normalize;

use crate::config::Config;

/// Token-Jaccard similarity of two strings after normalization.
///
/// Two empty strings are identical (1.0).
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize(a), normalize(b));
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let shared = left.intersection(&right).count();
    let total = left.union(&right).count();
    shared as f64 / total as f64
}

/// Normalized Levenshtein similarity of two names after normalization.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize(a), normalize(b));
    if a == b {
        return 1.0;
    }
    strsim::normalized_levenshtein(&a, &b)
}

/// Thresholds of the equivalence rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equivalence {
    pub role_threshold: f64,
    pub name_threshold: f64,
}

impl Default for Equivalence {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Equivalence {
    #[must_use]
    pub fn new(role_threshold: f64, name_threshold: f64) -> Self {
        Self {
            role_threshold,
            name_threshold,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.role_similarity_threshold, config.name_similarity_threshold)
    }

    pub fn roles_match(&self, a: &str, b: &str) -> bool {
        a == b || token_jaccard(a, b) >= self.role_threshold
    }

    pub fn names_match(&self, a: &str, b: &str) -> bool {
        name_similarity(a, b) >= self.name_threshold
    }

    /// Name similarity when `a` and `b` are equivalent, `None` otherwise.
    ///
    /// The score ranks competing candidates: higher is a closer match.
    pub fn score(&self, a: &ParsedCredit, b: &ParsedCredit) -> Option<f64> {
        if !self.roles_match(&a.normalized_role, &b.normalized_role) {
            return None;
        }
        let similarity = name_similarity(&a.person_name, &b.person_name);
        (similarity >= self.name_threshold).then_some(similarity)
    }

    pub fn equivalent(&self, a: &ParsedCredit, b: &ParsedCredit) -> bool {
        self.score(a, b).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liner_core::provenance::SourceId;
    use liner_core::taxonomy::RoleCategory;

    fn credit(name: &str, role: &str) -> ParsedCredit {
        ParsedCredit::new(name, role, role, RoleCategory::Production, SourceId::Discogs).unwrap()
    }

    #[test]
    fn test_token_jaccard() {
        assert!((token_jaccard("Mixing Engineer", "mixing engineer") - 1.0).abs() < f64::EPSILON);
        assert!((token_jaccard("Mixing Engineer", "Mastering Engineer") - 1.0 / 3.0).abs() < 1e-9);
        assert!(token_jaccard("Producer", "Composer").abs() < f64::EPSILON);
        assert!((token_jaccard("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_name_similarity() {
        assert!((name_similarity("Beyoncé", "BEYONCE") - 1.0).abs() < f64::EPSILON);
        assert!(name_similarity("DJ Premier", "DJ Premiere") >= 0.85);
        assert!(name_similarity("DJ Premier", "Pete Rock") < 0.5);
    }

    #[test]
    fn test_equivalent_same_role_close_name() {
        let rule = Equivalence::default();
        assert!(rule.equivalent(&credit("Jane Roe", "Producer"), &credit("jane roe", "Producer")));
        assert!(rule.equivalent(&credit("DJ Premier", "Producer"), &credit("DJ Premiere", "Producer")));
    }

    #[test]
    fn test_not_equivalent_different_role() {
        let rule = Equivalence::default();
        assert!(!rule.equivalent(
            &credit("Jane Roe", "Mixing Engineer"),
            &credit("Jane Roe", "Mastering Engineer")
        ));
    }

    #[test]
    fn test_not_equivalent_different_name() {
        let rule = Equivalence::default();
        assert!(!rule.equivalent(&credit("Jane Roe", "Producer"), &credit("John Doe", "Producer")));
    }

    #[test]
    fn test_role_threshold_is_configurable() {
        let loose = Equivalence::new(0.3, 0.85);
        assert!(loose.roles_match("Mixing Engineer", "Mastering Engineer"));
        assert!(!Equivalence::default().roles_match("Mixing Engineer", "Mastering Engineer"));
    }

    #[test]
    fn test_score_prefers_closer_name() {
        let rule = Equivalence::default();
        let target = credit("DJ Premier", "Producer");
        let exact = rule.score(&target, &credit("DJ Premier", "Producer")).unwrap();
        let close = rule.score(&target, &credit("DJ Premiere", "Producer")).unwrap();
        assert!(exact > close);
    }
}
