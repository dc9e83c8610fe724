//! The role taxonomy table: canonical roles, their categories, and the
//! aliases that map raw role text onto them.
//!
//! A taxonomy is built once, validated, and then only read. It can come
//! from the built-in table or from a TOML file of the form:
//!
//! ```toml
//! [[roles]]
//! canonical = "Producer"
//! category = "production"
//! aliases = ["produced by", "prod. by", "beatmaker"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::builtin::DEFAULT_ROLES;
use super::category::RoleCategory;
use crate::error::{Error, Result};
use crate::normalize::normalize;

/// The role assigned when nothing in the taxonomy matches.
pub const OTHER_ROLE: &str = "Other";

/// One canonical role with its category and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTaxonomyEntry {
    /// Canonical role name (e.g., "Mixing Engineer").
    pub canonical: String,

    /// The category this role belongs to.
    pub category: RoleCategory,

    /// Alternative spellings, abbreviations and translations.
    #[serde(default)]
    pub aliases: BTreeSet<String>,
}

impl RoleTaxonomyEntry {
    #[must_use]
    pub fn new(canonical: impl Into<String>, category: RoleCategory) -> Self {
        Self {
            canonical: canonical.into(),
            category,
            aliases: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }
}

/// Summary of a taxonomy build, returned as a value instead of being kept
/// in process-wide statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub entries: usize,
    pub aliases: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    roles: Vec<RoleTaxonomyEntry>,
}

/// A validated, immutable role taxonomy.
#[derive(Debug, Clone)]
pub struct RoleTaxonomy {
    entries: Vec<RoleTaxonomyEntry>,
    /// Normalized alias -> entry index, in declaration order.
    aliases: Vec<(String, usize)>,
    alias_index: HashMap<String, usize>,
    canonical_index: HashMap<String, usize>,
}

impl RoleTaxonomy {
    /// Build the taxonomy shipped with liner.
    pub fn builtin() -> Result<Self> {
        let entries = DEFAULT_ROLES
            .iter()
            .map(|&(canonical, category, aliases)| RoleTaxonomyEntry {
                canonical: canonical.to_string(),
                category,
                aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Build and validate a taxonomy from entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTaxonomy`] when `entries` is empty, and
    /// [`Error::InvalidData`] for blank or duplicate canonical names and for
    /// aliases claimed by more than one entry.
    pub fn from_entries(entries: Vec<RoleTaxonomyEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyTaxonomy);
        }

        let mut aliases = Vec::new();
        let mut alias_index: HashMap<String, usize> = HashMap::new();
        let mut canonical_index: HashMap<String, usize> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            let canonical_key = normalize(&entry.canonical);
            if canonical_key.is_empty() {
                return Err(Error::InvalidData(format!(
                    "taxonomy entry {} has a blank canonical role",
                    idx
                )));
            }
            if canonical_index.insert(canonical_key, idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "duplicate canonical role: {}",
                    entry.canonical
                )));
            }

            let names = std::iter::once(entry.canonical.as_str())
                .chain(entry.aliases.iter().map(String::as_str));
            for raw in names {
                let key = normalize(raw);
                if key.is_empty() {
                    continue;
                }
                match alias_index.get(&key).copied() {
                    Some(owner) if owner == idx => {}
                    Some(owner) => {
                        return Err(Error::InvalidData(format!(
                            "alias '{}' is claimed by both {} and {}",
                            raw, entries[owner].canonical, entry.canonical
                        )));
                    }
                    None => {
                        alias_index.insert(key.clone(), idx);
                        aliases.push((key, idx));
                    }
                }
            }
        }

        log::debug!(
            "Built role taxonomy: {} roles, {} aliases",
            entries.len(),
            aliases.len()
        );

        Ok(Self {
            entries,
            aliases,
            alias_index,
            canonical_index,
        })
    }

    /// Parse a taxonomy from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(content)
            .map_err(|e| Error::InvalidData(format!("failed to parse role taxonomy: {}", e)))?;
        Self::from_entries(file.roles)
    }

    /// Load a taxonomy from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting table fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidData(message) => {
                Error::InvalidData(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Serialize the taxonomy back to its TOML file form.
    pub fn to_toml_string(&self) -> Result<String> {
        let file = TaxonomyFile {
            roles: self.entries.clone(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| Error::InvalidData(format!("failed to serialize role taxonomy: {}", e)))
    }

    /// Look up an entry by an already-normalized alias.
    pub fn lookup_alias(&self, normalized_alias: &str) -> Option<&RoleTaxonomyEntry> {
        self.alias_index
            .get(normalized_alias)
            .map(|&idx| &self.entries[idx])
    }

    /// Look up an entry by canonical role name (case and accent insensitive).
    pub fn entry(&self, canonical: &str) -> Option<&RoleTaxonomyEntry> {
        self.canonical_index
            .get(&normalize(canonical))
            .map(|&idx| &self.entries[idx])
    }

    /// `true` when `role` is a canonical role of this taxonomy or the
    /// literal [`OTHER_ROLE`].
    pub fn contains_role(&self, role: &str) -> bool {
        role == OTHER_ROLE || self.entry(role).is_some()
    }

    /// The category of a canonical role; [`RoleCategory::Other`] when the
    /// role is unknown.
    pub fn category_of(&self, role: &str) -> RoleCategory {
        self.entry(role)
            .map(|e| e.category)
            .unwrap_or(RoleCategory::Other)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[RoleTaxonomyEntry] {
        &self.entries
    }

    /// All normalized aliases with their entries, in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &RoleTaxonomyEntry)> {
        self.aliases
            .iter()
            .map(|(alias, idx)| (alias.as_str(), &self.entries[*idx]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn report(&self) -> LoadReport {
        LoadReport {
            entries: self.entries.len(),
            aliases: self.aliases.len(),
        }
    }
}
