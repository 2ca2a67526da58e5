//! # Knowledge Base Module
//!
//! This module provides the curated ingredient knowledge base used during
//! label analysis, including JSON loading and the derived lookup index.
//!
//! ## Features
//!
//! - Ingredient records with health category, reason, and consumption notes
//! - Synonym support so one record answers for several spellings
//! - Case-insensitive lookup index built once from the raw table
//! - Graceful loading: a missing or unreadable file degrades to an empty base

use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use tracing::{debug, info, warn};

/// Health category assigned to a knowledge base entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Healthy,
    Moderate,
    Unhealthy,
    Neutral,
    Unknown,
}

impl Category {
    /// All recognized categories, in tally order
    pub const ALL: [Category; 5] = [
        Category::Healthy,
        Category::Moderate,
        Category::Unhealthy,
        Category::Neutral,
        Category::Unknown,
    ];

    /// Parse a category name as it appears in knowledge base JSON
    ///
    /// Matching is exact: category names are part of the data format
    /// contract, so `"healthy"` is not accepted for `"Healthy"`.
    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "Healthy" => Some(Category::Healthy),
            "Moderate" => Some(Category::Moderate),
            "Unhealthy" => Some(Category::Unhealthy),
            "Neutral" => Some(Category::Neutral),
            "Unknown" => Some(Category::Unknown),
            _ => None,
        }
    }

    /// Canonical string form, matching the JSON spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Healthy => "Healthy",
            Category::Moderate => "Moderate",
            Category::Unhealthy => "Unhealthy",
            Category::Neutral => "Neutral",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single curated ingredient record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    /// Health category, if the record carries a recognized one
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
    /// Short explanation of the categorization
    #[serde(default)]
    pub reason: Option<String>,
    /// Known after effects of consumption
    #[serde(default)]
    pub after_effects: Option<String>,
    /// Typical taste notes
    #[serde(default)]
    pub after_taste: Option<String>,
    /// Alternate names that resolve to this record
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Deserialize a category string without failing the whole document.
///
/// An unrecognized category name is logged and treated as absent, so one
/// dirty record cannot take down the rest of an otherwise valid file.
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = Category::parse(&value);
        if parsed.is_none() {
            warn!(
                category = %value,
                "Ignoring unrecognized knowledge base category"
            );
        }
        parsed
    }))
}

/// The raw knowledge base table: canonical ingredient key to record
///
/// Keys are stored sorted so that index construction and synonym collision
/// handling are deterministic regardless of the order records appear in the
/// source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    entries: BTreeMap<String, KnowledgeBaseEntry>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a knowledge base from its JSON document form
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let base: KnowledgeBase = serde_json::from_str(json)?;
        debug!(entry_count = base.len(), "Parsed knowledge base JSON");
        Ok(base)
    }

    /// Insert or replace a record under its canonical key
    pub fn insert(&mut self, key: impl Into<String>, entry: KnowledgeBaseEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Look up a record by its canonical key
    pub fn get(&self, key: &str) -> Option<&KnowledgeBaseEntry> {
        self.entries.get(key)
    }

    /// Iterate records in canonical key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &KnowledgeBaseEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-insensitive lookup index derived from a [`KnowledgeBase`]
///
/// The index maps every lowercased canonical key and synonym to its
/// canonical key. When two records claim the same lookup key, the record
/// with the lexicographically later canonical key wins, since records are
/// processed in sorted order and later inserts replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseIndex {
    entries: BTreeMap<String, KnowledgeBaseEntry>,
    lookup: BTreeMap<String, String>,
}

impl KnowledgeBaseIndex {
    /// Build the lookup index from a raw knowledge base
    pub fn build(base: KnowledgeBase) -> Self {
        let mut lookup = BTreeMap::new();

        for (key, entry) in base.iter() {
            if key.trim().is_empty() {
                warn!("Skipping knowledge base record with a blank key");
                continue;
            }

            lookup.insert(key.to_lowercase(), key.clone());

            for synonym in &entry.synonyms {
                if synonym.trim().is_empty() {
                    // A blank synonym would containment-match every candidate.
                    warn!(key = %key, "Skipping blank synonym");
                    continue;
                }
                lookup.insert(synonym.to_lowercase(), key.clone());
            }
        }

        info!(
            entry_count = base.len(),
            lookup_count = lookup.len(),
            "Built knowledge base index"
        );

        Self {
            entries: base.entries,
            lookup,
        }
    }

    /// An index over an empty knowledge base
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve an exact lookup key to its canonical key
    pub fn canonical_for(&self, lookup_key: &str) -> Option<&str> {
        self.lookup.get(lookup_key).map(String::as_str)
    }

    /// Fetch the record behind a canonical key
    pub fn entry(&self, canonical_key: &str) -> Option<&KnowledgeBaseEntry> {
        self.entries.get(canonical_key)
    }

    /// Iterate all lookup keys in sorted order
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> {
        self.lookup.keys().map(String::as_str)
    }

    /// Number of canonical records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of lookup keys (canonical keys plus synonyms)
    pub fn lookup_len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the knowledge base from its JSON file
///
/// Resolution order mirrors deployment layouts: an explicit path from the
/// `KNOWLEDGE_BASE_PATH` environment variable, then a set of conventional
/// locations. A missing or unparseable file degrades to an empty base so
/// analysis still runs, reporting every candidate as unknown.
pub fn load_knowledge_base() -> KnowledgeBase {
    // First, try to get path from environment variable
    if let Ok(config_path) = std::env::var("KNOWLEDGE_BASE_PATH") {
        info!(
            "Loading knowledge base from environment variable: {}",
            config_path
        );
        match fs::read_to_string(&config_path) {
            Ok(content) => match KnowledgeBase::from_json_str(&content) {
                Ok(base) => {
                    info!("Successfully loaded knowledge base from: {}", config_path);
                    return base;
                }
                Err(e) => {
                    warn!(
                        "Failed to parse knowledge base from '{}': {}. Falling back to default paths.",
                        config_path, e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read knowledge base from '{}': {}. Falling back to default paths.",
                    config_path, e
                );
            }
        }
    }

    // Fallback to conventional paths
    let possible_paths = [
        "/app/config/knowledge_base.json", // Docker path
        "config/knowledge_base.json",      // Local development path
        "../config/knowledge_base.json",   // Test path
    ];

    for config_path in &possible_paths {
        match fs::read_to_string(config_path) {
            Ok(content) => match KnowledgeBase::from_json_str(&content) {
                Ok(base) => {
                    info!(
                        "Successfully loaded knowledge base from fallback path: {}",
                        config_path
                    );
                    return base;
                }
                Err(e) => {
                    warn!(
                        "Failed to parse knowledge base at '{}': {}. Trying next path.",
                        config_path, e
                    );
                    continue;
                }
            },
            Err(_) => continue, // Try next path
        }
    }

    // If no file is found, return an empty base with a warning
    warn!("No knowledge base file found in any expected location. Using empty knowledge base.");
    KnowledgeBase::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_synonyms(category: Option<Category>, synonyms: &[&str]) -> KnowledgeBaseEntry {
        KnowledgeBaseEntry {
            category,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_parse_is_exact() {
        assert_eq!(Category::parse("Healthy"), Some(Category::Healthy));
        assert_eq!(Category::parse("Unknown"), Some(Category::Unknown));
        assert_eq!(Category::parse("healthy"), None);
        assert_eq!(Category::parse("HEALTHY"), None);
        assert_eq!(Category::parse("Spicy"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_display_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_from_json_str_parses_full_record() {
        let json = r#"{
            "sugar": {
                "category": "Unhealthy",
                "reason": "High glycemic impact",
                "after_effects": "Energy spike followed by a crash",
                "after_taste": "Sweet",
                "synonyms": ["cane sugar", "sucrose"]
            }
        }"#;

        let base = KnowledgeBase::from_json_str(json).unwrap();
        assert_eq!(base.len(), 1);

        let entry = base.get("sugar").unwrap();
        assert_eq!(entry.category, Some(Category::Unhealthy));
        assert_eq!(entry.reason.as_deref(), Some("High glycemic impact"));
        assert_eq!(entry.synonyms, vec!["cane sugar", "sucrose"]);
    }

    #[test]
    fn test_from_json_str_defaults_missing_fields() {
        let json = r#"{ "water": {} }"#;

        let base = KnowledgeBase::from_json_str(json).unwrap();
        let entry = base.get("water").unwrap();
        assert_eq!(entry.category, None);
        assert_eq!(entry.reason, None);
        assert!(entry.synonyms.is_empty());
    }

    #[test]
    fn test_from_json_str_tolerates_unrecognized_category() {
        let json = r#"{
            "turmeric": { "category": "Spicy", "synonyms": [] },
            "oats": { "category": "Healthy" }
        }"#;

        let base = KnowledgeBase::from_json_str(json).unwrap();
        assert_eq!(base.get("turmeric").unwrap().category, None);
        assert_eq!(base.get("oats").unwrap().category, Some(Category::Healthy));
    }

    #[test]
    fn test_from_json_str_rejects_malformed_document() {
        let result = KnowledgeBase::from_json_str("{ not json");
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("[KNOWLEDGE_BASE]"));
    }

    #[test]
    fn test_index_lookup_is_case_insensitive() {
        let mut base = KnowledgeBase::new();
        base.insert(
            "Olive Oil",
            entry_with_synonyms(Some(Category::Healthy), &["Extra Virgin Olive Oil"]),
        );

        let index = KnowledgeBaseIndex::build(base);
        assert_eq!(index.canonical_for("olive oil"), Some("Olive Oil"));
        assert_eq!(
            index.canonical_for("extra virgin olive oil"),
            Some("Olive Oil")
        );
        assert_eq!(index.canonical_for("Olive Oil"), None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup_len(), 2);
    }

    #[test]
    fn test_index_synonym_collision_is_deterministic() {
        let mut base = KnowledgeBase::new();
        base.insert(
            "agave",
            entry_with_synonyms(Some(Category::Moderate), &["natural sweetener"]),
        );
        base.insert(
            "honey",
            entry_with_synonyms(Some(Category::Moderate), &["natural sweetener"]),
        );

        // Records are processed in sorted key order, so "honey" claims the
        // shared synonym last.
        let index = KnowledgeBaseIndex::build(base);
        assert_eq!(index.canonical_for("natural sweetener"), Some("honey"));
    }

    #[test]
    fn test_index_skips_blank_keys_and_synonyms() {
        let mut base = KnowledgeBase::new();
        base.insert("  ", entry_with_synonyms(Some(Category::Neutral), &[]));
        base.insert(
            "salt",
            entry_with_synonyms(Some(Category::Moderate), &["", "sea salt"]),
        );

        let index = KnowledgeBaseIndex::build(base);
        assert_eq!(index.canonical_for("salt"), Some("salt"));
        assert_eq!(index.canonical_for("sea salt"), Some("salt"));
        assert_eq!(index.canonical_for(""), None);
        assert_eq!(index.lookup_len(), 2);
    }

    #[test]
    fn test_empty_index_answers_nothing() {
        let index = KnowledgeBaseIndex::empty();
        assert!(index.is_empty());
        assert_eq!(index.canonical_for("sugar"), None);
        assert_eq!(index.lookup_keys().count(), 0);
    }
}
