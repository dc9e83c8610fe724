//! Splitting raw credit text into `(role, names)` fragments.
//!
//! A blob such as `"Produced by John Doe, Mixed by Jane Roe"` is first cut on
//! credit-level separators, then each piece is split on an explicit `:` or
//! on the role keyword of the first detector pattern that matches. Role
//! keywords joined by a conjunction ("Produced and mixed by") share the
//! names that follow them.

use regex::Regex;

use crate::error::{compile, ResolveResult};

/// Role text assigned to fragments where no role keyword was found.
pub const UNKNOWN_ROLE: &str = "Unknown";

/// Fragments shorter than this (in characters) are discarded.
const MIN_FRAGMENT_LEN: usize = 3;

const CREDIT_SEPARATORS: [char; 4] = [',', ';', '|', '\n'];

/// Optional "by"/"par" that belongs to the role keyword ("Mixed by").
const BY_SUFFIX: &str = r"(?:\s+(?:by|par)\b)?";

/// The family of role keyword a detector recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Production,
    Writing,
    Performance,
    Engineering,
    Instrument,
    Featuring,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Writing => "writing",
            Self::Performance => "performance",
            Self::Engineering => "engineering",
            Self::Instrument => "instrument",
            Self::Featuring => "featuring",
        }
    }
}

/// Detector patterns in priority order. The first pattern with a hit
/// supplies the role; overlapping hits resolve to the earlier entry.
const DETECTOR_PATTERNS: &[(RoleKind, &str)] = &[
    (
        RoleKind::Production,
        r"(?:co-?|executive\s+|additional\s+)?(?:produc\w*|prod\b\.?|beat\s?mak\w*|beats\b|réalis[ée]s?\b|réalisation\b)",
    ),
    (
        RoleKind::Writing,
        r"(?:writ\w*|compos\w*|lyric\w*|author\w*|arrang\w*|écrit\w*|auteur\w*|paroles\b|parolier\w*)",
    ),
    (
        RoleKind::Performance,
        r"(?:(?:lead\s+|backing\s+)?vocal\w*|rap(?:per|pers|ped|s)?\b|sing(?:er|ers|ing|s)?\b|perform\w*|voix\b|chant(?:é|e|eur|euse|s)?\b)",
    ),
    (
        RoleKind::Engineering,
        r"(?:mix(?:ed|ing|é|age|er)?\b|master(?:ed|ing|isé)?\b|engineer\w*|record(?:ed|ing)\b|enregistr\w*|ingénieur\w*)",
    ),
    (
        RoleKind::Instrument,
        r"(?:guitar\w*|bass(?:e|ist|iste)?\b|drum(?:s|mer)?\b|batterie\b|percussions?\b|pian(?:o|ist|iste)\b|keyboards?\b|claviers?\b|synth\w*|violin\w*|violon\w*|sax\w*|trumpet\w*|trompette\b|fl[uû]te\b|organ\b|orgue\b)",
    ),
    (RoleKind::Featuring, r"(?:featuring\b|feat\b\.?|ft\b\.?|avec\b)"),
];

/// A role keyword located inside a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleHit {
    pub kind: RoleKind,
    pub start: usize,
    pub end: usize,
}

impl RoleHit {
    fn overlaps(&self, other: &RoleHit) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The precompiled role-detector patterns.
#[derive(Debug)]
pub struct RoleDetectors {
    detectors: Vec<(RoleKind, Regex)>,
    agent: Regex,
}

impl RoleDetectors {
    /// Compile every detector pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Pattern`](crate::ResolveError::Pattern) if a
    /// pattern fails to compile.
    pub fn new() -> ResolveResult<Self> {
        let detectors = DETECTOR_PATTERNS
            .iter()
            .map(|&(kind, body)| {
                let pattern = format!(r"(?i)\b{}{}", body, BY_SUFFIX);
                compile(kind.as_str(), &pattern).map(|re| (kind, re))
            })
            .collect::<ResolveResult<Vec<_>>>()?;
        Ok(Self {
            detectors,
            agent: compile("agent_suffix", r"(?i)\s(?:by|par)$")?,
        })
    }

    /// The first hit of the first pattern that matches `text`.
    pub fn find(&self, text: &str) -> Option<RoleHit> {
        self.detectors.iter().find_map(|(kind, re)| {
            re.find(text).map(|m| RoleHit {
                kind: *kind,
                start: m.start(),
                end: m.end(),
            })
        })
    }

    /// Every role keyword in `text`, in text order. Of two overlapping
    /// hits the one from the earlier pattern is kept.
    pub fn find_all(&self, text: &str) -> Vec<RoleHit> {
        let mut hits: Vec<RoleHit> = Vec::new();
        for (kind, re) in &self.detectors {
            for m in re.find_iter(text) {
                let hit = RoleHit {
                    kind: *kind,
                    start: m.start(),
                    end: m.end(),
                };
                if !hits.iter().any(|h| h.overlaps(&hit)) {
                    hits.push(hit);
                }
            }
        }
        hits.sort_by_key(|h| h.start);
        hits
    }

    /// Whether `hit` ends in "by"/"par" ("Mixed by", "Réalisé par").
    pub fn is_agent_phrase(&self, text: &str, hit: &RoleHit) -> bool {
        self.agent.is_match(&text[hit.start..hit.end])
    }

    /// The first role phrase ending in "by"/"par" inside `text`.
    pub fn find_agent_phrase(&self, text: &str) -> Option<RoleHit> {
        self.find_all(text)
            .into_iter()
            .find(|hit| self.is_agent_phrase(text, hit))
    }
}

/// One `(role, names)` pair cut from a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditFragment {
    /// Role text as written ("Produced by"), or [`UNKNOWN_ROLE`].
    pub role_text: String,
    pub names_text: String,
    /// Which detector recognised the role, if any.
    pub kind: Option<RoleKind>,
}

impl CreditFragment {
    fn unknown(names_text: &str) -> Self {
        Self {
            role_text: UNKNOWN_ROLE.to_string(),
            names_text: names_text.to_string(),
            kind: None,
        }
    }
}

/// Splits raw credit text into role and name fragments.
#[derive(Debug)]
pub struct RawCreditSegmenter {
    detectors: RoleDetectors,
    leading_by: Regex,
    conjunction: Regex,
    role_list: Regex,
}

impl RawCreditSegmenter {
    /// # Errors
    ///
    /// Returns an error if one of the detector patterns fails to compile.
    pub fn new() -> ResolveResult<Self> {
        Ok(Self {
            detectors: RoleDetectors::new()?,
            leading_by: compile("leading_by", r"(?i)^(?:by|par)\s+")?,
            conjunction: compile("role_conjunction", r"(?i)^\s*(?:and|et|&|/|\+)\s*$")?,
            role_list: compile("role_list", r"(?i)\s+(?:and|et)\s+|\s*[&/+]\s*")?,
        })
    }

    pub fn detectors(&self) -> &RoleDetectors {
        &self.detectors
    }

    /// Segment a blob. Empty or whitespace-only text yields no fragments.
    ///
    /// `&` starts a new credit only when the text after it opens with a
    /// role of its own and the text before it already names someone.
    /// `"feat. A & B"` and `"Produced & mixed by A"` therefore stay whole.
    pub fn segment(&self, text: &str) -> Vec<CreditFragment> {
        let mut fragments = Vec::new();

        for piece in text.split(CREDIT_SEPARATORS) {
            let mut parts: Vec<String> = Vec::new();
            for sub in piece.split('&').map(str::trim).filter(|s| !s.is_empty()) {
                match parts.last_mut() {
                    Some(prev) if !self.opens_credit(sub) || self.is_role_only(prev) => {
                        prev.push_str(" & ");
                        prev.push_str(sub);
                    }
                    _ => parts.push(sub.to_string()),
                }
            }

            for part in parts {
                if part.chars().count() < MIN_FRAGMENT_LEN {
                    log::debug!("Discarding short fragment {:?}", part);
                    continue;
                }
                fragments.extend(self.split_fragment(&part));
            }
        }

        fragments
    }

    /// Split one fragment into role and names. A chain of roles joined by
    /// conjunctions yields one fragment per role, all with the same names,
    /// the role of the first matching detector first.
    pub fn split_fragment(&self, fragment: &str) -> Vec<CreditFragment> {
        if let Some((role, names)) = split_explicit(fragment) {
            return self
                .split_role_list(role)
                .into_iter()
                .map(|role| CreditFragment {
                    role_text: role.to_string(),
                    names_text: names.to_string(),
                    kind: self.detectors.find(role).map(|hit| hit.kind),
                })
                .collect();
        }

        let hits = self.detectors.find_all(fragment);
        let Some(primary) = self.primary_hit(fragment, &hits) else {
            return vec![CreditFragment::unknown(fragment.trim())];
        };
        let chain = self.role_chain(fragment, &hits, primary);

        let (first, last) = (chain[0], chain[chain.len() - 1]);
        let after = self.clean_names_side(&fragment[hits[last].end..]);
        let names = if after.is_empty() {
            self.clean_names_side(&fragment[..hits[first].start])
        } else {
            after
        };

        std::iter::once(primary)
            .chain(chain.into_iter().filter(|&i| i != primary))
            .map(|i| CreditFragment {
                role_text: fragment[hits[i].start..hits[i].end].trim().to_string(),
                names_text: names.clone(),
                kind: Some(hits[i].kind),
            })
            .collect()
    }

    /// Index of the hit that supplies the role: the first in text order
    /// of the earliest pattern that hits in a role position. Keywords
    /// inside a name ("Chance the Rapper") are not in a role position.
    fn primary_hit(&self, fragment: &str, hits: &[RoleHit]) -> Option<usize> {
        let placed: Vec<usize> = (0..hits.len())
            .filter(|&i| self.in_role_position(fragment, &hits[i]))
            .collect();
        DETECTOR_PATTERNS
            .iter()
            .find_map(|(kind, _)| placed.iter().copied().find(|&i| hits[i].kind == *kind))
    }

    /// Leading, ending in "by"/"par", or trailing after punctuation
    /// ("DJ Premier - Producer").
    fn in_role_position(&self, fragment: &str, hit: &RoleHit) -> bool {
        let before = fragment[..hit.start].trim_end();
        if is_names_edge(before) || self.detectors.is_agent_phrase(fragment, hit) {
            return true;
        }
        let after = fragment[hit.end..].trim_start();
        is_names_edge(after.trim_start_matches([')', ']'])) && before.ends_with(NAME_ROLE_MARKS)
    }

    /// Indices of the hits chained to `primary` by conjunctions, in text
    /// order.
    fn role_chain(&self, fragment: &str, hits: &[RoleHit], primary: usize) -> Vec<usize> {
        let joined = |left: usize, right: usize| {
            self.conjunction
                .is_match(&fragment[hits[left].end..hits[right].start])
        };

        let mut first = primary;
        while first > 0 && joined(first - 1, first) {
            first -= 1;
        }
        let mut last = primary;
        while last + 1 < hits.len() && joined(last, last + 1) {
            last += 1;
        }
        (first..=last).collect()
    }

    /// `"Recording & Mixing"` as two roles, when every piece names one.
    fn split_role_list<'a>(&self, role: &'a str) -> Vec<&'a str> {
        let pieces: Vec<&str> = self
            .role_list
            .split(role)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if pieces.len() > 1 && pieces.iter().all(|p| self.detectors.find(p).is_some()) {
            pieces
        } else {
            vec![role]
        }
    }

    fn opens_credit(&self, text: &str) -> bool {
        split_explicit(text).is_some()
            || self
                .detectors
                .find_all(text)
                .first()
                .is_some_and(|hit| hit.start == 0)
    }

    fn is_role_only(&self, text: &str) -> bool {
        self.split_fragment(text)
            .iter()
            .all(|f| f.kind.is_some() && f.names_text.is_empty())
    }

    fn clean_names_side(&self, text: &str) -> String {
        let trimmed = text.trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '/' | '(' | ')' | '[' | ']')
        });
        self.leading_by.replace(trimmed, "").trim().to_string()
    }
}

/// Punctuation that sets a trailing role apart from the names before it.
const NAME_ROLE_MARKS: [char; 6] = ['-', '–', '—', '(', '[', '/'];

fn is_names_edge(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '(' | '['))
}

/// `"Role: Names"` with both sides non-empty.
fn split_explicit(fragment: &str) -> Option<(&str, &str)> {
    let (role, names) = fragment.split_once(':')?;
    let (role, names) = (role.trim(), names.trim());
    if role.is_empty() || names.is_empty() {
        None
    } else {
        Some((role, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> RawCreditSegmenter {
        RawCreditSegmenter::new().unwrap()
    }

    fn pairs(text: &str) -> Vec<(String, String)> {
        segmenter()
            .segment(text)
            .into_iter()
            .map(|f| (f.role_text, f.names_text))
            .collect()
    }

    fn pair(role: &str, names: &str) -> (String, String) {
        (role.to_string(), names.to_string())
    }

    #[test]
    fn test_detectors_compile() {
        assert!(RoleDetectors::new().is_ok());
    }

    #[test]
    fn test_two_credits() {
        assert_eq!(
            pairs("Produced by John Doe, Mixed by Jane Roe"),
            vec![pair("Produced by", "John Doe"), pair("Mixed by", "Jane Roe")]
        );
    }

    #[test]
    fn test_explicit_colon() {
        let fragments = segmenter().segment("Producer: DJ Premier");
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].role_text, "Producer");
        assert_eq!(fragments[0].names_text, "DJ Premier");
        assert_eq!(fragments[0].kind, Some(RoleKind::Production));
    }

    #[test]
    fn test_no_role_keeps_fragment() {
        let fragments = segmenter().segment("John Doe");
        assert_eq!(fragments, vec![CreditFragment::unknown("John Doe")]);
    }

    #[test]
    fn test_empty_text() {
        assert!(segmenter().segment("").is_empty());
        assert!(segmenter().segment("  \n ; ").is_empty());
    }

    #[test]
    fn test_short_fragments_discarded() {
        assert_eq!(
            pairs("ab; Mixed by Jane Roe"),
            vec![pair("Mixed by", "Jane Roe")]
        );
    }

    #[test]
    fn test_ampersand_joins_names() {
        assert_eq!(
            pairs("feat. Artist1 & Artist2"),
            vec![pair("feat.", "Artist1 & Artist2")]
        );
    }

    #[test]
    fn test_ampersand_separates_roles() {
        assert_eq!(
            pairs("Mixed by Jane Roe & Mastered by John Doe"),
            vec![pair("Mixed by", "Jane Roe"), pair("Mastered by", "John Doe")]
        );
    }

    #[test]
    fn test_names_before_role() {
        assert_eq!(pairs("DJ Premier - Producer"), vec![pair("Producer", "DJ Premier")]);
        assert_eq!(pairs("DJ Premier (producer)"), vec![pair("producer", "DJ Premier")]);
    }

    #[test]
    fn test_french_keywords() {
        assert_eq!(pairs("Réalisé par Kore"), vec![pair("Réalisé par", "Kore")]);
        assert_eq!(pairs("Mixé par Élodie"), vec![pair("Mixé par", "Élodie")]);
        assert_eq!(pairs("avec Oxmo Puccino"), vec![pair("avec", "Oxmo Puccino")]);
    }

    #[test]
    fn test_first_match_wins() {
        let fragments = segmenter().segment("Produced by Mix Master Mike");
        assert_eq!(fragments[0].kind, Some(RoleKind::Production));
        assert_eq!(fragments[0].names_text, "Mix Master Mike");
    }

    #[test]
    fn test_pattern_order_beats_position() {
        let detectors = RoleDetectors::new().unwrap();
        let hit = detectors.find("Mixed and produced by Pete Rock").unwrap();
        assert_eq!(hit.kind, RoleKind::Production);

        let fragments = segmenter().segment("Mixed and produced by Pete Rock");
        assert_eq!(fragments[0].kind, Some(RoleKind::Production));
        assert_eq!(fragments[0].role_text, "produced by");
        assert_eq!(fragments[1].kind, Some(RoleKind::Engineering));
        assert_eq!(fragments[1].role_text, "Mixed");
        assert!(fragments.iter().all(|f| f.names_text == "Pete Rock"));
    }

    #[test]
    fn test_role_chain_shares_names() {
        assert_eq!(
            pairs("Produced and mixed by Pete Rock"),
            vec![pair("Produced", "Pete Rock"), pair("mixed by", "Pete Rock")]
        );
        assert_eq!(
            pairs("Produced & mixed by Pete Rock"),
            vec![pair("Produced", "Pete Rock"), pair("mixed by", "Pete Rock")]
        );
        assert_eq!(
            pairs("Réalisé et mixé par Kore"),
            vec![pair("Réalisé", "Kore"), pair("mixé par", "Kore")]
        );
    }

    #[test]
    fn test_role_chain_across_families() {
        let fragments = segmenter().segment("Written and performed by Nas");
        let kinds: Vec<_> = fragments.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![Some(RoleKind::Writing), Some(RoleKind::Performance)]);
        assert_eq!(
            pairs("Written and performed by Nas"),
            vec![pair("Written", "Nas"), pair("performed by", "Nas")]
        );
    }

    #[test]
    fn test_explicit_role_list() {
        assert_eq!(
            pairs("Recording & Mixing: Jane Roe"),
            vec![pair("Recording", "Jane Roe"), pair("Mixing", "Jane Roe")]
        );
        assert_eq!(
            pairs("Producer/Engineer: Jane Roe"),
            vec![pair("Producer", "Jane Roe"), pair("Engineer", "Jane Roe")]
        );
        assert_eq!(
            pairs("Guitar/Talkbox: Roger Troutman"),
            vec![pair("Guitar/Talkbox", "Roger Troutman")]
        );
    }

    #[test]
    fn test_keyword_inside_name_after_ampersand() {
        let fragments = segmenter().segment("feat. Nas & Chance the Rapper");
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].kind, Some(RoleKind::Featuring));
        assert_eq!(fragments[0].names_text, "Nas & Chance the Rapper");
    }

    #[test]
    fn test_keyword_inside_name_only() {
        let fragments = segmenter().segment("Chance the Rapper");
        assert_eq!(fragments, vec![CreditFragment::unknown("Chance the Rapper")]);
    }

    #[test]
    fn test_find_all_in_text_order() {
        let detectors = RoleDetectors::new().unwrap();
        let kinds: Vec<RoleKind> = detectors
            .find_all("Produced and mixed by")
            .into_iter()
            .map(|hit| hit.kind)
            .collect();
        assert_eq!(kinds, vec![RoleKind::Production, RoleKind::Engineering]);
    }

    #[test]
    fn test_agent_phrase() {
        let detectors = RoleDetectors::new().unwrap();
        assert!(detectors.find_agent_phrase("and mixed by Pete Rock").is_some());
        assert!(detectors.find_agent_phrase("Réalisé par Kore").is_some());
        assert!(detectors.find_agent_phrase("Mix Master Mike").is_none());
        assert!(detectors.find_agent_phrase("Chance the Rapper").is_none());
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        let detectors = RoleDetectors::new().unwrap();
        assert!(detectors.find("Rapedia").is_none());
        assert!(detectors.find("Chantal Goya").is_none());
        assert!(detectors.find("Lefty").is_none());
    }

    #[test]
    fn test_detector_kinds() {
        let detectors = RoleDetectors::new().unwrap();
        let kind = |text: &str| detectors.find(text).map(|hit| hit.kind);
        assert_eq!(kind("Written by"), Some(RoleKind::Writing));
        assert_eq!(kind("Lead vocals"), Some(RoleKind::Performance));
        assert_eq!(kind("Mastered by"), Some(RoleKind::Engineering));
        assert_eq!(kind("Bass guitar"), Some(RoleKind::Instrument));
        assert_eq!(kind("ft. Nas"), Some(RoleKind::Featuring));
        assert_eq!(kind("Co-produced by"), Some(RoleKind::Production));
    }
}
