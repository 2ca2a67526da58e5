//! # Text Processing Module
//!
//! This module turns raw OCR text from food packaging into normalized
//! ingredient candidates ready for knowledge base resolution.
//!
//! ## Features
//!
//! - Ingredient section isolation from surrounding label text
//! - List-line selection with a leading-lines fallback for unpunctuated scans
//! - Noise stripping: parentheticals, numeric runs, and "contains" notices
//! - Unicode-aware token cleanup that preserves hyphens and ampersands
//! - Stable candidate order with no deduplication

use crate::errors::{AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration options for candidate extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Whether to isolate the text after an "ingredients" header before
    /// selecting candidate lines
    pub isolate_ingredient_section: bool,
    /// Number of leading lines scanned when no line looks like a list
    pub fallback_line_count: usize,
    /// Minimum candidate length in characters; shorter tokens are dropped
    pub min_token_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            isolate_ingredient_section: true,
            fallback_line_count: 3,
            min_token_chars: 2,
        }
    }
}

impl NormalizerConfig {
    /// Validate normalizer configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.fallback_line_count == 0 || self.fallback_line_count > 50 {
            return Err(AppError::Config(
                "fallback_line_count must be between 1 and 50".to_string(),
            ));
        }

        if self.min_token_chars == 0 || self.min_token_chars > 10 {
            return Err(AppError::Config(
                "min_token_chars must be between 1 and 10".to_string(),
            ));
        }

        Ok(())
    }
}

// Compiled once; all patterns run against lowercased text
lazy_static! {
    static ref SECTION_HEADER: Regex =
        Regex::new(r"ingredients?[:\-\s]*").expect("Section header pattern should be valid");
    static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^)]*\)").expect("Parenthetical pattern should be valid");
    static ref CONTAINS_NOTICE: Regex = Regex::new(r"\b(?:may contain|contains)\b")
        .expect("Contains notice pattern should be valid");
    static ref NUMERIC_RUN: Regex =
        Regex::new(r"\d+%?").expect("Numeric run pattern should be valid");
}

/// Normalizer that extracts ingredient candidates from raw label text
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Create a normalizer with the default configuration
    pub fn new() -> Self {
        Self {
            config: NormalizerConfig::default(),
        }
    }

    /// Create a normalizer with custom configuration
    pub fn with_config(config: NormalizerConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Extract normalized ingredient candidates from raw OCR text
    ///
    /// Candidates keep their label order and are not deduplicated here;
    /// repeated mentions collapse later during resolution. The heuristics
    /// are best effort: unrecognizable input produces an empty list, never
    /// an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ingredient_health::text_processing::TextNormalizer;
    ///
    /// let normalizer = TextNormalizer::new();
    /// let candidates =
    ///     normalizer.extract_candidates("Ingredients: Sugar (4%), Palm Oil, Salt");
    /// assert_eq!(candidates, vec!["sugar", "palm oil", "salt"]);
    /// ```
    pub fn extract_candidates(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let trimmed = lowered.trim();
        if trimmed.is_empty() {
            debug!("Input text is empty after trimming");
            return Vec::new();
        }

        let section = if self.config.isolate_ingredient_section {
            self.isolate_section(trimmed)
        } else {
            trimmed
        };

        let list_text = self.select_list_text(section);
        let cleaned = strip_noise(&list_text);

        let candidates: Vec<String> = cleaned
            .split([',', ';'])
            .map(clean_token)
            .filter(|token| token.chars().count() >= self.config.min_token_chars)
            .collect();

        debug!(
            candidate_count = candidates.len(),
            "Extracted ingredient candidates"
        );
        trace!(?candidates, "Candidate list");
        candidates
    }

    /// Take the text after an ingredient header when one is present.
    ///
    /// A header with nothing after it yields an empty section, which
    /// produces zero candidates downstream.
    fn isolate_section<'a>(&self, text: &'a str) -> &'a str {
        match SECTION_HEADER.find(text) {
            Some(m) => {
                trace!(offset = m.end(), "Isolated ingredient section");
                &text[m.end()..]
            }
            None => text,
        }
    }

    /// Pick the lines that look like an ingredient list.
    ///
    /// Lines holding a comma or semicolon are joined in order. When none
    /// qualify, the leading lines stand in, since short scans often lose
    /// list punctuation.
    fn select_list_text(&self, section: &str) -> String {
        let lines: Vec<&str> = section
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let list_lines: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| line.contains(',') || line.contains(';'))
            .collect();

        if !list_lines.is_empty() {
            return list_lines.join(" ");
        }

        debug!(
            fallback_line_count = self.config.fallback_line_count,
            "No list-like lines found, falling back to leading lines"
        );
        lines
            .iter()
            .take(self.config.fallback_line_count)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove label noise that is not part of any ingredient name
fn strip_noise(text: &str) -> String {
    let text = PARENTHETICAL.replace_all(text, "");
    let text = CONTAINS_NOTICE.replace_all(&text, "");
    let text = NUMERIC_RUN.replace_all(&text, "");
    text.into_owned()
}

/// Reduce a raw list segment to its ingredient text
///
/// Keeps alphabetic characters, whitespace, hyphens, and ampersands, then
/// collapses whitespace runs. Unicode letters pass through untouched.
fn clean_token(segment: &str) -> String {
    let kept: String = segment
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace() || *c == '-' || *c == '&')
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
