//! # Ingredient Analyzer
//!
//! End-to-end facade over the analysis pipeline: candidate extraction,
//! knowledge base resolution, and category aggregation. An analyzer owns a
//! read-only index and configured pipeline stages, so one instance can be
//! shared freely across concurrent analysis calls.

use crate::aggregation;
use crate::config::AnalyzerConfig;
use crate::errors::AppResult;
use crate::knowledge_base::KnowledgeBaseIndex;
use crate::report::{AnalysisReport, NoMatchesReport, ResolvedReport, NO_MATCHES_MESSAGE};
use crate::resolver::Resolver;
use crate::text_processing::TextNormalizer;
use tracing::info;

/// Analyzer that turns raw label text into an [`AnalysisReport`]
pub struct IngredientAnalyzer {
    index: KnowledgeBaseIndex,
    normalizer: TextNormalizer,
    resolver: Resolver,
}

impl IngredientAnalyzer {
    /// Create an analyzer with the default pipeline configuration
    pub fn new(index: KnowledgeBaseIndex) -> Self {
        Self {
            index,
            normalizer: TextNormalizer::new(),
            resolver: Resolver::new(),
        }
    }

    /// Create an analyzer with custom pipeline configuration
    pub fn with_config(index: KnowledgeBaseIndex, config: AnalyzerConfig) -> AppResult<Self> {
        Ok(Self {
            normalizer: TextNormalizer::with_config(config.normalizer)?,
            resolver: Resolver::with_config(config.matcher)?,
            index,
        })
    }

    /// The knowledge base index backing this analyzer
    pub fn index(&self) -> &KnowledgeBaseIndex {
        &self.index
    }

    /// Analyze one label scan and produce a typed report
    ///
    /// Analysis never fails: empty input, an empty knowledge base, or text
    /// with no recognizable list all produce a `NoMatches` report rather
    /// than an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ingredient_health::analyzer::IngredientAnalyzer;
    /// use ingredient_health::knowledge_base::{KnowledgeBase, KnowledgeBaseIndex};
    ///
    /// let base = KnowledgeBase::from_json_str(
    ///     r#"{ "sugar": { "category": "Unhealthy", "synonyms": ["cane sugar"] } }"#,
    /// )?;
    /// let analyzer = IngredientAnalyzer::new(KnowledgeBaseIndex::build(base));
    ///
    /// let report = analyzer.analyze("Ingredients: Cane Sugar, Salt");
    /// assert_eq!(report.resolved()[0].canonical_key, "sugar");
    /// assert_eq!(report.unknown(), ["salt".to_string()]);
    /// # Ok::<(), ingredient_health::errors::AppError>(())
    /// ```
    pub fn analyze(&self, text: &str) -> AnalysisReport {
        let candidates = self.normalizer.extract_candidates(text);
        let resolution = self.resolver.resolve(&self.index, &candidates);

        if resolution.resolved.is_empty() {
            info!(
                candidate_count = candidates.len(),
                unknown_count = resolution.unknown.len(),
                "Analysis found no knowledge base matches"
            );
            return AnalysisReport::NoMatches(NoMatchesReport {
                unknown: resolution.unknown,
                message: NO_MATCHES_MESSAGE.to_string(),
            });
        }

        let counts = aggregation::tally(&resolution.resolved);
        let percentages = aggregation::percentages(&counts);
        let (verdict, reason) = aggregation::derive_verdict(&counts);

        info!(
            resolved_count = resolution.resolved.len(),
            unknown_count = resolution.unknown.len(),
            verdict = %verdict,
            "Analysis complete"
        );

        AnalysisReport::Resolved(ResolvedReport {
            resolved: resolution.resolved,
            unknown: resolution.unknown,
            counts,
            percentages,
            verdict,
            verdict_reason: reason.to_string(),
        })
    }
}
