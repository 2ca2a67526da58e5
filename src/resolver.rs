//! # Candidate Resolution Module
//!
//! Maps normalized ingredient candidates onto knowledge base records using
//! staged matching:
//!
//! 1. Exact lookup against the case-insensitive index
//! 2. Containment scan ranked by overlap length, longest wins
//! 3. Dice bigram similarity with a strict acceptance threshold
//!
//! A later stage only runs when the earlier ones produce nothing, and every
//! stage is deterministic for a given index and configuration.

use crate::errors::{AppError, AppResult};
use crate::knowledge_base::KnowledgeBaseIndex;
use crate::report::ResolvedIngredient;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Configuration options for candidate matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Whether the containment stage runs between exact and fuzzy matching
    pub enable_substring_match: bool,
    /// Fuzzy acceptance threshold; the best score must strictly exceed it.
    /// Phrase-heavy knowledge bases warrant a stricter cutoff than the
    /// default, since longer strings share more incidental bigrams.
    pub similarity_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            enable_substring_match: true,
            similarity_threshold: 0.6,
        }
    }
}

impl MatcherConfig {
    /// Validate matcher configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold < 1.0) {
            return Err(AppError::Config(
                "similarity_threshold must be strictly between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Outcome of resolving a batch of candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Candidates that resolved to a record, in first-mention order
    pub resolved: Vec<ResolvedIngredient>,
    /// Candidates that resolved to nothing, verbatim and deduplicated
    pub unknown: Vec<String>,
}

/// Staged matcher from candidates to knowledge base records
pub struct Resolver {
    config: MatcherConfig,
}

impl Resolver {
    /// Create a resolver with the default configuration
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }

    /// Create a resolver with custom configuration
    pub fn with_config(config: MatcherConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Resolve a candidate batch against the knowledge base index
    ///
    /// Each canonical key appears at most once in the result; repeat
    /// resolutions collapse onto the first mention. Candidates that match
    /// nothing land in `unknown` once, verbatim. The batch never fails:
    /// an empty index simply marks everything unknown.
    pub fn resolve(&self, index: &KnowledgeBaseIndex, candidates: &[String]) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen_keys: HashSet<String> = HashSet::new();

        for candidate in candidates {
            match self.match_candidate(index, candidate) {
                Some(canonical) => {
                    if seen_keys.contains(&canonical) {
                        trace!(
                            candidate = %candidate,
                            canonical_key = %canonical,
                            "Collapsed repeat resolution"
                        );
                        continue;
                    }

                    match index.entry(&canonical) {
                        Some(entry) => {
                            seen_keys.insert(canonical.clone());
                            resolution.resolved.push(ResolvedIngredient {
                                canonical_key: canonical,
                                matched_text: candidate.clone(),
                                entry: entry.clone(),
                            });
                        }
                        None => {
                            // Lookup keys always target an indexed record;
                            // treat a miss as unknown rather than panic.
                            warn!(
                                canonical_key = %canonical,
                                "Lookup key points at a missing record"
                            );
                            push_unknown(&mut resolution.unknown, candidate);
                        }
                    }
                }
                None => push_unknown(&mut resolution.unknown, candidate),
            }
        }

        debug!(
            resolved_count = resolution.resolved.len(),
            unknown_count = resolution.unknown.len(),
            "Resolved candidate batch"
        );
        resolution
    }

    /// Run the matching stages for one candidate
    fn match_candidate(&self, index: &KnowledgeBaseIndex, candidate: &str) -> Option<String> {
        if let Some(canonical) = index.canonical_for(candidate) {
            trace!(candidate = %candidate, canonical_key = %canonical, "Exact match");
            return Some(canonical.to_string());
        }

        if self.config.enable_substring_match {
            if let Some(lookup_key) = self.best_containment(index, candidate) {
                let canonical = index.canonical_for(lookup_key)?;
                debug!(
                    candidate = %candidate,
                    lookup_key = %lookup_key,
                    canonical_key = %canonical,
                    "Containment match"
                );
                return Some(canonical.to_string());
            }
        }

        if let Some((lookup_key, score)) = self.best_fuzzy(index, candidate) {
            if score > self.config.similarity_threshold {
                let canonical = index.canonical_for(lookup_key)?;
                debug!(
                    candidate = %candidate,
                    lookup_key = %lookup_key,
                    canonical_key = %canonical,
                    score = score,
                    "Fuzzy match accepted"
                );
                return Some(canonical.to_string());
            }
            trace!(
                candidate = %candidate,
                best_key = %lookup_key,
                score = score,
                "Best fuzzy score does not clear threshold"
            );
        }

        None
    }

    /// Scan for the best containment overlap between candidate and keys
    ///
    /// Ranking is by overlap length, then shorter key, then lexicographic
    /// order, which the sorted key iteration provides on its own.
    fn best_containment<'a>(
        &self,
        index: &'a KnowledgeBaseIndex,
        candidate: &str,
    ) -> Option<&'a str> {
        let mut best: Option<(&str, usize)> = None;

        for key in index.lookup_keys() {
            let overlap = if key.contains(candidate) {
                candidate.len()
            } else if candidate.contains(key) {
                key.len()
            } else {
                continue;
            };

            // Zero overlap means an empty candidate or key; never a match.
            if overlap == 0 {
                continue;
            }

            let better = match best {
                None => true,
                Some((best_key, best_overlap)) => {
                    overlap > best_overlap
                        || (overlap == best_overlap && key.len() < best_key.len())
                }
            };
            if better {
                best = Some((key, overlap));
            }
        }

        best.map(|(key, _)| key)
    }

    /// Find the lookup key with the highest bigram similarity
    fn best_fuzzy<'a>(
        &self,
        index: &'a KnowledgeBaseIndex,
        candidate: &str,
    ) -> Option<(&'a str, f64)> {
        let mut best: Option<(&'a str, f64)> = None;

        for key in index.lookup_keys() {
            let score = dice_similarity(candidate, key);
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if better {
                best = Some((key, score));
            }
        }

        best
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unknown(unknown: &mut Vec<String>, candidate: &str) {
    if !unknown.iter().any(|existing| existing == candidate) {
        unknown.push(candidate.to_string());
    }
}

/// Sørensen-Dice similarity over boundary-padded character bigrams
///
/// Each string contributes one bigram per character plus one for each end,
/// with `None` standing in for the boundary. Padding keeps a single
/// character difference from dominating short strings, so close OCR
/// misspellings still score above a 0.6 cutoff.
///
/// # Examples
///
/// ```rust
/// use ingredient_health::resolver::dice_similarity;
///
/// assert_eq!(dice_similarity("sugar", "sugar"), 1.0);
/// assert!(dice_similarity("suger", "sugar") > 0.6);
/// assert_eq!(dice_similarity("sugar", "xyz"), 0.0);
/// ```
pub fn dice_similarity(a: &str, b: &str) -> f64 {
    let a_bigrams = padded_bigrams(a);
    let b_bigrams = padded_bigrams(b);

    let mut available: HashMap<(Option<char>, Option<char>), usize> = HashMap::new();
    for bigram in &a_bigrams {
        *available.entry(*bigram).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for bigram in &b_bigrams {
        if let Some(count) = available.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    2.0 * shared as f64 / (a_bigrams.len() + b_bigrams.len()) as f64
}

/// Character bigrams with `None` boundary markers at both ends
fn padded_bigrams(text: &str) -> Vec<(Option<char>, Option<char>)> {
    let padded: Vec<Option<char>> = std::iter::once(None)
        .chain(text.chars().map(Some))
        .chain(std::iter::once(None))
        .collect();

    padded.windows(2).map(|pair| (pair[0], pair[1])).collect()
}
