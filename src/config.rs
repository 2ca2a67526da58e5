//! # Unified Analyzer Configuration
//!
//! This module consolidates the tunable settings of the analysis pipeline
//! into a single structured configuration object. It supports loading from
//! environment variables, validation, and a loggable summary.

use crate::errors::{AppError, AppResult};
use crate::resolver::MatcherConfig;
use crate::text_processing::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Unified analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Candidate extraction settings
    pub normalizer: NormalizerConfig,
    /// Candidate matching settings
    pub matcher: MatcherConfig,
}

impl AnalyzerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults; set variables must parse.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.normalizer.isolate_ingredient_section = env::var("INGREDIENT_SECTION_ISOLATION")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            == "true";
        config.normalizer.fallback_line_count = env::var("NORMALIZER_FALLBACK_LINES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("NORMALIZER_FALLBACK_LINES must be a valid number".to_string())
            })?;
        config.normalizer.min_token_chars = env::var("NORMALIZER_MIN_TOKEN_CHARS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("NORMALIZER_MIN_TOKEN_CHARS must be a valid number".to_string())
            })?;

        config.matcher.enable_substring_match = env::var("MATCHER_ENABLE_SUBSTRING")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            == "true";
        config.matcher.similarity_threshold = env::var("MATCHER_SIMILARITY_THRESHOLD")
            .unwrap_or_else(|_| "0.6".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("MATCHER_SIMILARITY_THRESHOLD must be a valid number".to_string())
            })?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.normalizer.validate()?;
        self.matcher.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: section_isolation={}, fallback_lines={}, min_token_chars={}, substring_match={}, similarity_threshold={}",
            self.normalizer.isolate_ingredient_section,
            self.normalizer.fallback_line_count,
            self.normalizer.min_token_chars,
            self.matcher.enable_substring_match,
            self.matcher.similarity_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_covers_both_sections() {
        let mut config = AnalyzerConfig::default();

        config.normalizer.min_token_chars = 0;
        assert!(config.validate().is_err());
        config.normalizer.min_token_chars = 2;

        config.matcher.similarity_threshold = 1.2;
        assert!(config.validate().is_err());
        config.matcher.similarity_threshold = 0.6;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_mentions_key_settings() {
        let summary = AnalyzerConfig::default().summary();
        assert!(summary.contains("similarity_threshold=0.6"));
        assert!(summary.contains("fallback_lines=3"));
    }
}
