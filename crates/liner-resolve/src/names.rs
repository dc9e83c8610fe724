//! Name segmentation: splitting a names fragment into plausible person
//! names.

use regex::Regex;

use liner_core::model::MAX_NAME_LEN;
use liner_core::normalize::{collapse_whitespace, fold_diacritics, normalize, strip_brackets};

use crate::error::{compile, ResolveResult};
use crate::segment::RoleDetectors;

const MIN_NAME_LEN: usize = 2;

/// Tokens that look like names but never are.
const DENYLIST: &[&str] = &[
    "unknown",
    "various",
    "various artists",
    "multiple",
    "others",
    "etc",
    "and",
    "et",
    "credits",
    "production",
    "all",
    "rights",
    "reserved",
    "n a",
    "na",
    "none",
    "tbd",
];

/// A candidate name that survived cleaning and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub name: String,
    /// A heuristic correction (suffix or honorific stripped) was applied.
    pub corrected: bool,
}

/// Splits names fragments and filters out implausible tokens.
#[derive(Debug)]
pub struct NameSegmenter {
    separators: Regex,
    honorific: Regex,
    leftover_role: Regex,
    detectors: RoleDetectors,
}

impl NameSegmenter {
    /// # Errors
    ///
    /// Returns an error if one of the patterns fails to compile.
    pub fn new() -> ResolveResult<Self> {
        Ok(Self {
            separators: compile("name_separators", r"(?i)\s*[,&]\s*|\s+and\s+|\s+et\s+")?,
            honorific: compile(
                "honorific",
                r"(?i)^(?:mr|mrs|ms|mme|mlle|monsieur|madame)\.?\s+",
            )?,
            leftover_role: compile(
                "leftover_role",
                r"(?i)^(?:and|et|by|par|featuring|feat\.?|ft\.?)\s+",
            )?,
            detectors: RoleDetectors::new()?,
        })
    }

    /// Split a names fragment into validated names, in order. Duplicates
    /// are preserved.
    pub fn segment(&self, fragment: &str) -> Vec<NameCandidate> {
        self.separators
            .split(fragment)
            .filter_map(|raw| {
                let candidate = self.clean_name(raw);
                if self.is_plausible(&candidate.name) {
                    Some(candidate)
                } else {
                    if !raw.trim().is_empty() {
                        log::debug!("Dropping implausible name {:?}", raw.trim());
                    }
                    None
                }
            })
            .collect()
    }

    /// Strip disambiguation suffixes ("(3)"), honorifics and stray role
    /// words, then collapse whitespace.
    pub fn clean_name(&self, raw: &str) -> NameCandidate {
        let mut corrected = false;

        let mut name = collapse_whitespace(raw);
        name = self.leftover_role.replace(&name, "").into_owned();

        if name.contains(['(', '[', '{']) {
            name = strip_brackets(&name);
            corrected = true;
        }

        if self.honorific.is_match(&name) {
            name = self.honorific.replace(&name, "").into_owned();
            corrected = true;
        }

        NameCandidate {
            name: collapse_whitespace(&name),
            corrected,
        }
    }

    /// Length, character class and denylist checks. A role phrase such as
    /// "mixed by" rules the candidate out; a bare keyword inside a stage
    /// name ("Mix Master Mike") does not.
    pub fn is_plausible(&self, name: &str) -> bool {
        let len = name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return false;
        }

        let folded = fold_diacritics(name);
        let mut chars = folded.chars();
        if !chars.next().is_some_and(char::is_alphanumeric) {
            return false;
        }
        if !folded
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '.'))
        {
            return false;
        }

        let visible = folded.chars().filter(|c| !c.is_whitespace()).count();
        let letters = folded.chars().filter(|c| c.is_alphabetic()).count();
        if letters * 2 < visible {
            return false;
        }

        if DENYLIST.contains(&normalize(name).as_str()) {
            return false;
        }

        self.detectors.find_agent_phrase(name).is_none()
    }
}
