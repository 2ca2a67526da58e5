//! # Ingredient Health Analyzer
//!
//! A library that reads noisy OCR text from food packaging, resolves the
//! ingredient list against a curated knowledge base, and reports per-category
//! tallies with an overall health verdict.

pub mod aggregation;
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod knowledge_base;
pub mod report;
pub mod resolver;
pub mod text_processing;

// Re-export types for easier access
pub use aggregation::{CategoryCounts, CategoryPercentages, Verdict};
pub use analyzer::IngredientAnalyzer;
pub use config::AnalyzerConfig;
pub use knowledge_base::{Category, KnowledgeBase, KnowledgeBaseEntry, KnowledgeBaseIndex};
pub use report::{AnalysisReport, ResolvedIngredient};
