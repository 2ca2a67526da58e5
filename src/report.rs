//! # Analysis Report Model
//!
//! Typed output of a label analysis run. A report is either `Resolved`,
//! carrying per-ingredient details and aggregate health figures, or
//! `NoMatches` when nothing in the input mapped to the knowledge base.
//! Downstream presentation branches on the variant instead of probing for
//! sentinel fields.

use crate::aggregation::{CategoryCounts, CategoryPercentages, Verdict};
use crate::knowledge_base::KnowledgeBaseEntry;
use serde::{Deserialize, Serialize};

/// Message carried by a report when no candidate resolved
pub const NO_MATCHES_MESSAGE: &str = "No recognizable ingredients found in database.";

/// A candidate that resolved to a knowledge base record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIngredient {
    /// Canonical knowledge base key the candidate resolved to
    pub canonical_key: String,
    /// The literal candidate text that produced the match
    pub matched_text: String,
    /// Full record copied from the knowledge base
    #[serde(flatten)]
    pub entry: KnowledgeBaseEntry,
}

/// Details of a run where at least one candidate resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReport {
    /// Resolved ingredients in first-mention order, one per canonical key
    pub resolved: Vec<ResolvedIngredient>,
    /// Candidates that matched nothing, verbatim and deduplicated
    pub unknown: Vec<String>,
    /// Per-category tallies over `resolved`
    pub counts: CategoryCounts,
    /// Category shares rounded to one decimal place
    pub percentages: CategoryPercentages,
    /// Overall health classification
    pub verdict: Verdict,
    /// Human-readable sentence explaining the verdict
    pub verdict_reason: String,
}

/// Details of a run where nothing resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoMatchesReport {
    /// Candidates that matched nothing, verbatim and deduplicated
    pub unknown: Vec<String>,
    /// Sentinel message for display
    pub message: String,
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisReport {
    /// At least one candidate resolved against the knowledge base
    Resolved(ResolvedReport),
    /// No candidate resolved; counts and verdict are undefined
    NoMatches(NoMatchesReport),
}

impl AnalysisReport {
    /// Whether this run produced no knowledge base matches
    pub fn is_no_matches(&self) -> bool {
        matches!(self, AnalysisReport::NoMatches(_))
    }

    /// Resolved ingredients, empty when nothing matched
    pub fn resolved(&self) -> &[ResolvedIngredient] {
        match self {
            AnalysisReport::Resolved(report) => &report.resolved,
            AnalysisReport::NoMatches(_) => &[],
        }
    }

    /// Candidates that did not resolve
    pub fn unknown(&self) -> &[String] {
        match self {
            AnalysisReport::Resolved(report) => &report.unknown,
            AnalysisReport::NoMatches(report) => &report.unknown,
        }
    }

    /// Overall verdict, absent when nothing matched
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            AnalysisReport::Resolved(report) => Some(report.verdict),
            AnalysisReport::NoMatches(_) => None,
        }
    }
}
