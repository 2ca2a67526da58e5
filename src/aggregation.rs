//! # Category Aggregation Module
//!
//! Tallies resolved ingredients into the five fixed health categories,
//! computes rounded category percentages, and derives the overall verdict
//! for a label.

use crate::knowledge_base::Category;
use crate::report::ResolvedIngredient;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Reason reported when unhealthy ingredients outnumber the rest
pub const REASON_MORE_UNHEALTHY: &str = "Contains more unhealthy ingredients than healthy ones.";
/// Reason reported when healthy ingredients outnumber unhealthy ones
pub const REASON_MORE_HEALTHY: &str = "Contains more healthy ingredients than unhealthy ones.";
/// Reason reported when neither side dominates
pub const REASON_BALANCED: &str = "A balanced mix of ingredients.";

/// Number of resolved ingredients in each fixed category
///
/// Resolved entries whose record carries no recognized category are present
/// in the report but never land in a bucket here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryCounts {
    pub healthy: usize,
    pub moderate: usize,
    pub unhealthy: usize,
    pub neutral: usize,
    pub unknown: usize,
}

impl CategoryCounts {
    /// Count for one category
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Healthy => self.healthy,
            Category::Moderate => self.moderate,
            Category::Unhealthy => self.unhealthy,
            Category::Neutral => self.neutral,
            Category::Unknown => self.unknown,
        }
    }

    fn bump(&mut self, category: Category) {
        match category {
            Category::Healthy => self.healthy += 1,
            Category::Moderate => self.moderate += 1,
            Category::Unhealthy => self.unhealthy += 1,
            Category::Neutral => self.neutral += 1,
            Category::Unknown => self.unknown += 1,
        }
    }

    /// Sum of all five buckets
    pub fn total(&self) -> usize {
        self.healthy + self.moderate + self.unhealthy + self.neutral + self.unknown
    }
}

/// Category shares of the bucketed total, rounded to one decimal place
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryPercentages {
    pub healthy: f64,
    pub moderate: f64,
    pub unhealthy: f64,
    pub neutral: f64,
    pub unknown: f64,
}

impl CategoryPercentages {
    /// Percentage for one category
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Healthy => self.healthy,
            Category::Moderate => self.moderate,
            Category::Unhealthy => self.unhealthy,
            Category::Neutral => self.neutral,
            Category::Unknown => self.unknown,
        }
    }
}

/// Overall qualitative health classification of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Healthy,
    Moderate,
    Unhealthy,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Healthy => "Healthy",
            Verdict::Moderate => "Moderate",
            Verdict::Unhealthy => "Unhealthy",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tally resolved ingredients into category buckets
pub fn tally(resolved: &[ResolvedIngredient]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();

    for ingredient in resolved {
        match ingredient.entry.category {
            Some(category) => counts.bump(category),
            None => {
                trace!(
                    canonical_key = %ingredient.canonical_key,
                    "Resolved ingredient has no category, excluded from counts"
                );
            }
        }
    }

    counts
}

/// Compute category shares of the bucketed total
///
/// A zero total divides by one instead, so an all-uncategorized batch
/// reports 0.0 everywhere rather than failing.
pub fn percentages(counts: &CategoryCounts) -> CategoryPercentages {
    let divisor = counts.total().max(1) as f64;

    CategoryPercentages {
        healthy: round_one_decimal(counts.healthy as f64 / divisor * 100.0),
        moderate: round_one_decimal(counts.moderate as f64 / divisor * 100.0),
        unhealthy: round_one_decimal(counts.unhealthy as f64 / divisor * 100.0),
        neutral: round_one_decimal(counts.neutral as f64 / divisor * 100.0),
        unknown: round_one_decimal(counts.unknown as f64 / divisor * 100.0),
    }
}

/// Derive the verdict from category counts
///
/// Rules are evaluated in fixed order, first match wins:
///
/// 1. Unhealthy outnumbers healthy plus moderate → `Unhealthy`
/// 2. Healthy outnumbers unhealthy → `Healthy`
/// 3. Otherwise → `Moderate`
///
/// Neutral and Unknown counts never influence the verdict, only the
/// percentage denominator.
pub fn derive_verdict(counts: &CategoryCounts) -> (Verdict, &'static str) {
    if counts.unhealthy > counts.healthy + counts.moderate {
        (Verdict::Unhealthy, REASON_MORE_UNHEALTHY)
    } else if counts.healthy > counts.unhealthy {
        (Verdict::Healthy, REASON_MORE_HEALTHY)
    } else {
        (Verdict::Moderate, REASON_BALANCED)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
