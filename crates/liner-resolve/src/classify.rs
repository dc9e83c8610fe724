//! Role classification: mapping role text onto the taxonomy.
//!
//! Matching runs in a fixed priority order and the first hit wins:
//!
//! 1. exact alias match (confidence 1.0)
//! 2. substring match between alias and fragment (0.8)
//! 3. keyword buckets (0.6)
//! 4. fallback to [`OTHER_ROLE`] (0.3)

use dashmap::DashMap;
use std::sync::Arc;

use liner_core::normalize::{normalize, title_case};
use liner_core::taxonomy::{RoleCategory, RoleTaxonomy, RoleTaxonomyEntry, OTHER_ROLE};
use serde::{Deserialize, Serialize};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const SUBSTRING_CONFIDENCE: f64 = 0.8;
pub const KEYWORD_CONFIDENCE: f64 = 0.6;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Fragments shorter than this never match as a substring of an alias.
const MIN_PARTIAL_LEN: usize = 3;

/// Ordered `(category, [(keyword, canonical role)])` buckets. Keywords are
/// matched against the start of a word of the normalized fragment.
const KEYWORD_BUCKETS: &[(RoleCategory, &[(&str, &str)])] = &[
    (
        RoleCategory::Production,
        &[
            ("produc", "Producer"),
            ("prod", "Producer"),
            ("beat", "Producer"),
            ("realis", "Producer"),
        ],
    ),
    (
        RoleCategory::Engineering,
        &[
            ("mix", "Mixing Engineer"),
            ("master", "Mastering Engineer"),
            ("record", "Recording Engineer"),
            ("enregistr", "Recording Engineer"),
            ("engineer", "Sound Engineer"),
            ("ingenieur", "Sound Engineer"),
        ],
    ),
    (
        RoleCategory::Writing,
        &[
            ("lyric", "Lyricist"),
            ("parol", "Lyricist"),
            ("compos", "Composer"),
            ("arrang", "Arranger"),
            ("writ", "Songwriter"),
            ("author", "Songwriter"),
            ("auteur", "Songwriter"),
            ("ecri", "Songwriter"),
        ],
    ),
    (
        RoleCategory::Performance,
        &[
            ("feat", "Featured Artist"),
            ("rap", "Rapper"),
            ("vocal", "Vocalist"),
            ("voix", "Vocalist"),
            ("sing", "Vocalist"),
            ("chant", "Vocalist"),
            ("perform", "Vocalist"),
        ],
    ),
    (
        RoleCategory::Instrumentation,
        &[
            ("guitar", "Guitarist"),
            ("bass", "Bassist"),
            ("drum", "Drummer"),
            ("batter", "Drummer"),
            ("percuss", "Percussionist"),
            ("pian", "Pianist"),
            ("keyboard", "Keyboardist"),
            ("clavier", "Keyboardist"),
            ("synth", "Synthesizer Player"),
            ("instrument", "Instrumentalist"),
            ("sax", "Instrumentalist"),
            ("trumpet", "Instrumentalist"),
            ("trompet", "Instrumentalist"),
            ("violin", "Instrumentalist"),
            ("violon", "Instrumentalist"),
            ("flute", "Instrumentalist"),
            ("organ", "Instrumentalist"),
            ("orgue", "Instrumentalist"),
        ],
    ),
];

/// The classifier's verdict for one role fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMatch {
    /// A canonical taxonomy role or [`OTHER_ROLE`].
    pub normalized_role: String,
    pub category: RoleCategory,
    pub confidence: f64,
    /// Display label. Equals `normalized_role` except for fallback matches,
    /// where it is the title-cased fragment ("Talkbox Player").
    pub label: String,
}

impl RoleMatch {
    fn from_entry(entry: &RoleTaxonomyEntry, confidence: f64) -> Self {
        Self {
            normalized_role: entry.canonical.clone(),
            category: entry.category,
            confidence,
            label: entry.canonical.clone(),
        }
    }

    fn fallback(key: &str) -> Self {
        Self {
            normalized_role: OTHER_ROLE.to_string(),
            category: RoleCategory::Other,
            confidence: FALLBACK_CONFIDENCE,
            label: title_case(key),
        }
    }

    /// `true` when the fragment matched nothing in the taxonomy.
    pub fn is_fallback(&self) -> bool {
        self.normalized_role == OTHER_ROLE && self.confidence <= FALLBACK_CONFIDENCE
    }
}

/// `true` when `needle` occurs in `haystack` at the start of a word.
fn occurs_at_word_start(haystack: &str, needle: &str) -> bool {
    haystack
        .match_indices(needle)
        .any(|(idx, _)| idx == 0 || haystack[..idx].ends_with([' ', '-']))
}

/// Deterministic, stateless role classifier over a shared taxonomy.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    taxonomy: Arc<RoleTaxonomy>,
}

impl RoleClassifier {
    #[must_use]
    pub fn new(taxonomy: Arc<RoleTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &RoleTaxonomy {
        &self.taxonomy
    }

    /// Classify raw role text.
    pub fn classify(&self, fragment: &str) -> RoleMatch {
        self.classify_key(&normalize(fragment))
    }

    /// Classify an already-normalized fragment.
    pub fn classify_key(&self, key: &str) -> RoleMatch {
        if key.is_empty() {
            return RoleMatch::fallback(key);
        }
        if let Some(entry) = self.taxonomy.lookup_alias(key) {
            return RoleMatch::from_entry(entry, EXACT_CONFIDENCE);
        }
        if let Some(entry) = self.substring_match(key) {
            return RoleMatch::from_entry(entry, SUBSTRING_CONFIDENCE);
        }
        if let Some(entry) = self.keyword_match(key) {
            return RoleMatch::from_entry(entry, KEYWORD_CONFIDENCE);
        }
        RoleMatch::fallback(key)
    }

    /// Longest alias contained in the fragment, else the shortest alias
    /// containing it. Equal lengths keep declaration order.
    fn substring_match(&self, key: &str) -> Option<&RoleTaxonomyEntry> {
        let mut contained: Option<(usize, &RoleTaxonomyEntry)> = None;
        let mut containing: Option<(usize, &RoleTaxonomyEntry)> = None;

        for (alias, entry) in self.taxonomy.aliases() {
            if alias.len() <= key.len() {
                if occurs_at_word_start(key, alias)
                    && contained.map_or(true, |(len, _)| alias.len() > len)
                {
                    contained = Some((alias.len(), entry));
                }
            } else if key.len() >= MIN_PARTIAL_LEN
                && occurs_at_word_start(alias, key)
                && containing.map_or(true, |(len, _)| alias.len() < len)
            {
                containing = Some((alias.len(), entry));
            }
        }

        contained.or(containing).map(|(_, entry)| entry)
    }

    fn keyword_match(&self, key: &str) -> Option<&RoleTaxonomyEntry> {
        let words: Vec<&str> = key.split([' ', '-']).filter(|w| !w.is_empty()).collect();
        KEYWORD_BUCKETS
            .iter()
            .flat_map(|(_, keywords)| keywords.iter())
            .filter(|(keyword, _)| words.iter().any(|w| w.starts_with(keyword)))
            .find_map(|(_, canonical)| self.taxonomy.entry(canonical))
    }
}

/// Default number of distinct fragments a [`MemoizedClassifier`] keeps.
pub const DEFAULT_MEMO_CAPACITY: usize = 4096;

/// A [`RoleClassifier`] with a thread-safe memo of past verdicts.
///
/// The memo is keyed on the normalized fragment only, which fully
/// determines the verdict. It lives as long as the classifier and stops
/// growing at its capacity; fragments seen after that are classified
/// without being stored.
#[derive(Debug)]
pub struct MemoizedClassifier {
    inner: RoleClassifier,
    memo: DashMap<String, RoleMatch>,
    capacity: usize,
}

impl MemoizedClassifier {
    #[must_use]
    pub fn new(inner: RoleClassifier) -> Self {
        Self::with_capacity(inner, DEFAULT_MEMO_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(inner: RoleClassifier, capacity: usize) -> Self {
        Self {
            inner,
            memo: DashMap::new(),
            capacity,
        }
    }

    pub fn inner(&self) -> &RoleClassifier {
        &self.inner
    }

    pub fn classify(&self, fragment: &str) -> RoleMatch {
        let key = normalize(fragment);

        if let Some(hit) = self.memo.get(&key).map(|r| r.clone()) {
            return hit;
        }

        let verdict = self.inner.classify_key(&key);
        if self.memo.len() < self.capacity {
            self.memo.entry(key).or_insert_with(|| verdict.clone());
        }
        verdict
    }

    /// Number of memoized fragments.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liner_core::taxonomy::RoleTaxonomyEntry;

    fn classifier() -> RoleClassifier {
        RoleClassifier::new(Arc::new(RoleTaxonomy::builtin().unwrap()))
    }

    #[test]
    fn test_exact_alias() {
        let verdict = classifier().classify("Produced by");
        assert_eq!(verdict.normalized_role, "Producer");
        assert_eq!(verdict.category, RoleCategory::Production);
        assert!((verdict.confidence - EXACT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_is_case_and_accent_insensitive() {
        let c = classifier();
        assert_eq!(c.classify("MIXÉ PAR").normalized_role, "Mixing Engineer");
        assert_eq!(c.classify("feat.").normalized_role, "Featured Artist");
        assert_eq!(c.classify("Prod. by").normalized_role, "Producer");
    }

    #[test]
    fn test_substring_alias_in_fragment() {
        let verdict = classifier().classify("Additional vocals by");
        assert!((verdict.confidence - SUBSTRING_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(verdict.normalized_role, "Vocalist");
    }

    #[test]
    fn test_substring_prefers_longest_alias() {
        let verdict = classifier().classify("Mastering engineer (stem)");
        assert_eq!(verdict.normalized_role, "Mastering Engineer");
        assert!((verdict.confidence - SUBSTRING_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_substring_fragment_in_alias() {
        let verdict = classifier().classify("lyricis");
        assert_eq!(verdict.normalized_role, "Lyricist");
        assert!((verdict.confidence - SUBSTRING_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_keyword_bucket() {
        let verdict = classifier().classify("Programmation drumkit");
        assert_eq!(verdict.normalized_role, "Drummer");
        assert!((verdict.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_performed_by_is_performance() {
        let verdict = classifier().classify("performed by");
        assert_eq!(verdict.category, RoleCategory::Performance);
        assert!((verdict.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_keyword_bucket_order() {
        // Production keywords are scanned before engineering ones.
        let verdict = classifier().classify("Beatmaking ingénieur");
        assert_eq!(verdict.normalized_role, "Producer");
        assert!((verdict.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fallback() {
        let verdict = classifier().classify("TALKBOX player");
        assert_eq!(verdict.normalized_role, OTHER_ROLE);
        assert_eq!(verdict.category, RoleCategory::Other);
        assert_eq!(verdict.label, "Talkbox Player");
        assert!((verdict.confidence - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
        assert!(verdict.is_fallback());
    }

    #[test]
    fn test_empty_fragment_falls_back() {
        let verdict = classifier().classify("###");
        assert_eq!(verdict.normalized_role, OTHER_ROLE);
    }

    #[test]
    fn test_keywords_match_word_starts_only() {
        assert_eq!(classifier().classify("Remixeur").normalized_role, OTHER_ROLE);
    }

    #[test]
    fn test_keywords_skip_roles_missing_from_taxonomy() {
        let taxonomy = RoleTaxonomy::from_entries(vec![RoleTaxonomyEntry::new(
            "Producer",
            RoleCategory::Production,
        )])
        .unwrap();
        let c = RoleClassifier::new(Arc::new(taxonomy));
        assert_eq!(c.classify("Guitar solo").normalized_role, OTHER_ROLE);
        assert_eq!(c.classify("beatmaking").normalized_role, "Producer");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let c = classifier();
        for fragment in ["Produced by", "Talkbox", "lyricis", "Guitare"] {
            assert_eq!(c.classify(fragment), c.classify(fragment));
        }
    }

    #[test]
    fn test_memoized_matches_inner() {
        let memo = MemoizedClassifier::new(classifier());
        for fragment in ["Produced by", "PRODUCED BY", "Talkbox Player", "Mixed by"] {
            assert_eq!(memo.classify(fragment), memo.inner().classify(fragment));
        }
        // "Produced by" and "PRODUCED BY" share one memo slot.
        assert_eq!(memo.memo_len(), 3);
    }

    #[test]
    fn test_memo_stops_growing_at_capacity() {
        let memo = MemoizedClassifier::with_capacity(classifier(), 2);
        for fragment in ["Produced by", "Mixed by", "Mastered by", "Talkbox"] {
            assert_eq!(memo.classify(fragment), memo.inner().classify(fragment));
        }
        assert_eq!(memo.memo_len(), 2);
        assert_eq!(memo.capacity(), 2);
        // Unstored fragments still classify.
        assert_eq!(memo.classify("Mastered by").normalized_role, "Mastering Engineer");
    }

    #[test]
    fn test_memoized_is_shareable_across_threads() {
        let memo = Arc::new(MemoizedClassifier::new(classifier()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let memo = Arc::clone(&memo);
                std::thread::spawn(move || memo.classify("Mastered by").normalized_role)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Mastering Engineer");
        }
        assert_eq!(memo.memo_len(), 1);
    }
}
