//! # Resolver Integration Tests
//!
//! Staged matching against a realistic multi-record index, exercising the
//! interplay of exact, containment, and fuzzy stages on label-shaped input.

mod test_helpers;

use ingredient_health::knowledge_base::{Category, KnowledgeBaseIndex};
use ingredient_health::resolver::{MatcherConfig, Resolver};
use test_helpers::{entry, sample_index, sample_knowledge_base};

fn batch(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_exact_stage_wins_before_any_scan() {
    let index = sample_index();
    let resolver = Resolver::new();

    // "salt" is both a key and a substring of "sea salt"; exact lookup
    // settles it without consulting the containment stage
    let resolution = resolver.resolve(&index, &batch(&["salt"]));
    assert_eq!(resolution.resolved.len(), 1);
    assert_eq!(resolution.resolved[0].canonical_key, "salt");
}

#[test]
fn test_synonyms_match_case_insensitively() {
    let index = sample_index();
    let resolver = Resolver::new();

    for candidate in ["sucrose", "oatmeal", "spring water", "natural flavouring"] {
        let resolution = resolver.resolve(&index, &batch(&[candidate]));
        assert_eq!(
            resolution.resolved.len(),
            1,
            "{} should resolve",
            candidate
        );
        assert!(resolution.unknown.is_empty());
    }
}

#[test]
fn test_containment_matches_key_inside_candidate() {
    let index = sample_index();
    let resolver = Resolver::new();

    // No exact hit for the full phrase; "rolled oats" is the longest
    // contained key
    let resolution = resolver.resolve(&index, &batch(&["organic rolled oats mix"]));
    assert_eq!(resolution.resolved.len(), 1);
    assert_eq!(resolution.resolved[0].canonical_key, "oats");
    assert_eq!(resolution.resolved[0].matched_text, "organic rolled oats mix");
}

#[test]
fn test_containment_matches_candidate_inside_key() {
    let index = sample_index();
    let resolver = Resolver::new();

    // "oat" sits inside "oats", "oatmeal", and "rolled oats"; equal overlap
    // everywhere, so the shortest key wins
    let resolution = resolver.resolve(&index, &batch(&["oat"]));
    assert_eq!(resolution.resolved.len(), 1);
    assert_eq!(resolution.resolved[0].canonical_key, "oats");
}

#[test]
fn test_resolution_order_follows_first_mention() {
    let index = sample_index();
    let resolver = Resolver::new();

    let resolution = resolver.resolve(
        &index,
        &batch(&["spring water", "cane sugar", "rolled oats", "sea salt"]),
    );

    let keys: Vec<&str> = resolution
        .resolved
        .iter()
        .map(|r| r.canonical_key.as_str())
        .collect();
    assert_eq!(keys, vec!["water", "sugar", "oats", "salt"]);
}

#[test]
fn test_resolution_is_deterministic_across_runs() {
    let index = sample_index();
    let resolver = Resolver::new();
    let candidates = batch(&["oat", "suger", "organic cane sugar blend", "glorp"]);

    let first = resolver.resolve(&index, &candidates);
    for _ in 0..5 {
        assert_eq!(resolver.resolve(&index, &candidates), first);
    }
}

#[test]
fn test_fuzzy_stage_only_runs_when_scans_miss() {
    let index = sample_index();
    let resolver = Resolver::new();

    // A one-letter OCR slip on a word with no containment overlap
    let resolution = resolver.resolve(&index, &batch(&["olive oik"]));
    assert_eq!(resolution.resolved.len(), 1);
    assert_eq!(resolution.resolved[0].canonical_key, "olive oil");
}

#[test]
fn test_disabled_substring_stage_still_allows_fuzzy() {
    let mut base = sample_knowledge_base();
    base.insert("vinegar", entry(Some(Category::Neutral), &[]));
    let index = KnowledgeBaseIndex::build(base);

    let resolver = Resolver::with_config(MatcherConfig {
        enable_substring_match: false,
        ..Default::default()
    })
    .unwrap();

    // Containment would have caught the phrase; without it the phrase is
    // too dissimilar for the fuzzy stage
    let phrase = resolver.resolve(&index, &batch(&["organic rolled oats mix"]));
    assert!(phrase.resolved.is_empty());
    assert_eq!(phrase.unknown, vec!["organic rolled oats mix"]);

    // A close misspelling still clears the threshold
    let slip = resolver.resolve(&index, &batch(&["vinegor"]));
    assert_eq!(slip.resolved.len(), 1);
    assert_eq!(slip.resolved[0].canonical_key, "vinegar");
}

#[test]
fn test_mixed_batch_partitions_cleanly() {
    let index = sample_index();
    let resolver = Resolver::new();

    let resolution = resolver.resolve(
        &index,
        &batch(&["rolled oats", "snozzberry jam", "suger", "snozzberry jam"]),
    );

    let keys: Vec<&str> = resolution
        .resolved
        .iter()
        .map(|r| r.canonical_key.as_str())
        .collect();
    assert_eq!(keys, vec!["oats", "sugar"]);
    assert_eq!(resolution.unknown, vec!["snozzberry jam"]);
}
