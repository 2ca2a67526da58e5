//! # Test Helper Library
//!
//! This module provides common fixtures shared by integration tests to
//! reduce duplication and keep knowledge base setup consistent across
//! test files.

use ingredient_health::knowledge_base::{
    Category, KnowledgeBase, KnowledgeBaseEntry, KnowledgeBaseIndex,
};

/// Build an entry with a category and synonyms, other fields defaulted
pub fn entry(category: Option<Category>, synonyms: &[&str]) -> KnowledgeBaseEntry {
    KnowledgeBaseEntry {
        category,
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

/// A small knowledge base covering all five categories plus synonyms
pub fn sample_knowledge_base() -> KnowledgeBase {
    let mut base = KnowledgeBase::new();
    base.insert(
        "sugar",
        entry(Some(Category::Unhealthy), &["cane sugar", "sucrose"]),
    );
    base.insert("palm oil", entry(Some(Category::Unhealthy), &[]));
    base.insert("salt", entry(Some(Category::Moderate), &["sea salt"]));
    base.insert(
        "oats",
        entry(Some(Category::Healthy), &["rolled oats", "oatmeal"]),
    );
    base.insert(
        "olive oil",
        entry(Some(Category::Healthy), &["extra virgin olive oil"]),
    );
    base.insert("water", entry(Some(Category::Neutral), &["spring water"]));
    base.insert(
        "natural flavors",
        entry(Some(Category::Unknown), &["natural flavouring"]),
    );
    base
}

/// Index built over [`sample_knowledge_base`]
pub fn sample_index() -> KnowledgeBaseIndex {
    KnowledgeBaseIndex::build(sample_knowledge_base())
}
