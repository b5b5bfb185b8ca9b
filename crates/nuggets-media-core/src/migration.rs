//! Tag/category dual-write migration.
//!
//! Posts historically stored free-form `categories`; the replacement field is
//! `tags`. The active [`MigrationPhase`] decides which field is written and
//! which one is authoritative on read.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationPhase {
    /// Only `categories` is written and read
    LegacyOnly,

    /// Both fields are written, `tags` is preferred on read
    #[default]
    DualWrite,

    /// Only `tags` is written and read
    NewOnly,
}

impl MigrationPhase {
    pub fn writes_legacy(self) -> bool {
        matches!(self, Self::LegacyOnly | Self::DualWrite)
    }

    pub fn writes_new(self) -> bool {
        matches!(self, Self::DualWrite | Self::NewOnly)
    }
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LegacyOnly => "legacy-only",
            Self::DualWrite => "dual-write",
            Self::NewOnly => "new-only",
        };
        f.write_str(name)
    }
}

impl FromStr for MigrationPhase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy-only" | "legacy" => Ok(Self::LegacyOnly),
            "dual-write" | "dual" => Ok(Self::DualWrite),
            "new-only" | "new" => Ok(Self::NewOnly),
            other => Err(Error::Configuration(format!(
                "Unknown migration phase: {}",
                other
            ))),
        }
    }
}

/// Tag-bearing fields of a post document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFields {
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Differences between the legacy and new field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDrift {
    /// Present in `categories` but missing from `tags`
    pub missing_from_tags: Vec<String>,

    /// Present in `tags` but missing from `categories`
    pub missing_from_categories: Vec<String>,
}

impl TagDrift {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_tags.is_empty() && self.missing_from_categories.is_empty()
    }
}

/// Trim, drop blanks and dedupe case-insensitively; first casing wins
pub fn clean_tags<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| value.as_ref().trim())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Write tags into the fields the phase makes writable.
///
/// Fields the phase does not write are left untouched.
pub fn write_tags<S: AsRef<str>>(phase: MigrationPhase, fields: &mut TagFields, values: &[S]) {
    let cleaned = clean_tags(values);
    debug!("Writing {} tags in {} phase", cleaned.len(), phase);

    if phase.writes_legacy() {
        fields.categories = cleaned.clone();
    }
    if phase.writes_new() {
        fields.tags = cleaned;
    }
}

/// Read the authoritative tags for the phase
pub fn read_tags(phase: MigrationPhase, fields: &TagFields) -> Vec<String> {
    match phase {
        MigrationPhase::LegacyOnly => clean_tags(&fields.categories),
        MigrationPhase::NewOnly => clean_tags(&fields.tags),
        MigrationPhase::DualWrite if fields.tags.is_empty() => {
            if !fields.categories.is_empty() {
                warn!("Tags empty during dual-write, falling back to categories");
            }
            clean_tags(&fields.categories)
        }
        MigrationPhase::DualWrite => clean_tags(&fields.tags),
    }
}

/// Compare the two fields case-insensitively
pub fn audit(fields: &TagFields) -> TagDrift {
    let categories = clean_tags(&fields.categories);
    let tags = clean_tags(&fields.tags);
    let category_keys: HashSet<String> = categories.iter().map(|c| c.to_lowercase()).collect();
    let tag_keys: HashSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();

    TagDrift {
        missing_from_tags: categories
            .into_iter()
            .filter(|c| !tag_keys.contains(&c.to_lowercase()))
            .collect(),
        missing_from_categories: tags
            .into_iter()
            .filter(|t| !category_keys.contains(&t.to_lowercase()))
            .collect(),
    }
}
