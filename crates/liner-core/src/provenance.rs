//! Source provenance: where a credit mention came from and how much each
//! origin is trusted when sources disagree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The origin of a raw credit mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Rapedia pages (French rap encyclopedia).
    Rapedia,
    /// Discogs release credits.
    Discogs,
    /// Genius song page, scraped.
    GeniusWeb,
    /// Genius API `custom_performances` and producer/writer fields.
    GeniusApi,
    /// Spotify track credits.
    Spotify,
    /// Last.fm wiki text.
    #[serde(rename = "lastfm")]
    LastFm,
    /// Manual entry by the user.
    Manual,
}

/// Canonical string names for each [`SourceId`] variant, matching the keys
/// used in configuration files and JSON input.
const SOURCE_NAMES: &[(SourceId, &str)] = &[
    (SourceId::Rapedia, "rapedia"),
    (SourceId::Discogs, "discogs"),
    (SourceId::GeniusWeb, "genius_web"),
    (SourceId::GeniusApi, "genius_api"),
    (SourceId::Spotify, "spotify"),
    (SourceId::LastFm, "lastfm"),
    (SourceId::Manual, "manual"),
];

impl SourceId {
    /// All known sources in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        SOURCE_NAMES.iter().map(|&(s, _)| s)
    }

    /// The canonical snake_case name of this source.
    pub fn name(self) -> &'static str {
        for &(s, name) in SOURCE_NAMES {
            if s == self {
                return name;
            }
        }
        "unknown"
    }

    /// Parse a source name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        SOURCE_NAMES
            .iter()
            .find(|(_, canonical)| canonical.eq_ignore_ascii_case(name.trim()))
            .map(|&(s, _)| s)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidData(format!("unknown source: {s}")))
    }
}

/// Default reliability ranking: rapedia > discogs > genius_web > others.
pub fn default_source_priority() -> HashMap<String, u32> {
    HashMap::from([
        ("rapedia".to_string(), 10),
        ("discogs".to_string(), 8),
        ("genius_web".to_string(), 6),
        ("genius_api".to_string(), 5),
        ("spotify".to_string(), 3),
        ("lastfm".to_string(), 2),
        ("manual".to_string(), 1),
    ])
}

/// Source reliability ranking, injected from configuration.
///
/// Higher ranks win ties. Sources missing from the map rank 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRanking {
    priorities: HashMap<String, u32>,
}

impl SourceRanking {
    #[must_use]
    pub fn new(priorities: HashMap<String, u32>) -> Self {
        Self { priorities }
    }

    /// The reliability rank of a source.
    pub fn rank(&self, source: SourceId) -> u32 {
        let name = source.name();
        if let Some(&rank) = self.priorities.get(name) {
            return rank;
        }
        self.priorities
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, &rank)| rank)
            .unwrap_or(0)
    }

    /// Compare two sources by reliability; `Greater` means `a` is more
    /// trusted. Equal ranks fall back to declaration order so the result is
    /// total and deterministic.
    pub fn compare(&self, a: SourceId, b: SourceId) -> std::cmp::Ordering {
        self.rank(a)
            .cmp(&self.rank(b))
            .then_with(|| b.cmp(&a))
    }
}

impl Default for SourceRanking {
    fn default() -> Self {
        Self::new(default_source_priority())
    }
}
