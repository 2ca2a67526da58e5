//! Label analysis walkthrough
//!
//! Loads the knowledge base from `config/knowledge_base.json`, analyzes a
//! noisy OCR scan of a food label, and prints the structured report as JSON.
//!
//! Run with: `cargo run --example analyze_label`

use anyhow::Result;
use ingredient_health::analyzer::IngredientAnalyzer;
use ingredient_health::config::AnalyzerConfig;
use ingredient_health::knowledge_base::{load_knowledge_base, KnowledgeBaseIndex};
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AnalyzerConfig::from_env()?;
    config.validate()?;
    info!("{}", config.summary());

    let base = load_knowledge_base();
    let index = KnowledgeBaseIndex::build(base);
    let analyzer = IngredientAnalyzer::with_config(index, config)?;

    // Text as it typically comes back from an OCR pass over a wrapper photo
    let label_text = "NUTRITION FACTS per 100g\n\
        Ingredients: whole wheat flour, suger, palm oil (4%), salt,\n\
        soy lecithin, natural flavors\n\
        May contain traces of nuts";

    let report = analyzer.analyze(label_text);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
