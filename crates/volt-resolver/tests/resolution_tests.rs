//! Integration tests for volt-resolver
//!
//! These tests exercise the public resolve API on realistic mention lists.

use proptest::prelude::*;
use volt_resolver::{Deduplicator, ResolverConfig};

const WELL_SEPARATED: [&str; 8] = [
    "Google", "Microsoft", "Apple", "Siemens", "Toyota", "Nestle", "Samsung", "Unilever",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_article_mentions_preserve_first_appearance_order() {
    let dedup = Deduplicator::default_config();
    let mentions = owned(&[
        "Stripe",
        "Adyen N.V.",
        "Stripe, Inc.",
        "PayPal Holdings",
        "Adyen",
        "stripe",
    ]);

    let result = dedup.resolve(&mentions).unwrap();
    let names: Vec<_> = result.entities.iter().map(|e| e.canonical_name.as_str()).collect();
    assert_eq!(names, vec!["Stripe, Inc.", "Adyen N.V.", "PayPal Holdings"]);

    // "stripe" repeats the previous representative case-insensitively
    assert_eq!(result.entities[0].aliases, vec!["Stripe"]);
    assert_eq!(result.entities[1].aliases, vec!["Adyen"]);
}

#[test]
fn test_entity_ids_are_unique() {
    let dedup = Deduplicator::default_config();
    let result = dedup.resolve(&owned(&WELL_SEPARATED)).unwrap();

    let mut ids: Vec<_> = result.entities.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), WELL_SEPARATED.len());
}

#[test]
fn test_strict_threshold_separates_typos() {
    let dedup = Deduplicator::new(ResolverConfig::with_threshold(1.0)).unwrap();
    let result = dedup.resolve(&owned(&["Microsoft", "Microsft"])).unwrap();
    assert_eq!(result.entities.len(), 2);
}

proptest! {
    /// Property: re-running on an already-deduplicated set is a 1:1 identity
    #[test]
    fn test_dedup_is_idempotent_on_canonical_names(
        names in proptest::sample::subsequence(WELL_SEPARATED.to_vec(), 1..=WELL_SEPARATED.len())
    ) {
        let dedup = Deduplicator::default_config();
        let first = dedup.resolve(&owned(&names)).unwrap();
        prop_assert_eq!(first.entities.len(), names.len());

        let canonical: Vec<String> = first
            .entities
            .iter()
            .map(|e| e.canonical_name.clone())
            .collect();
        let second = dedup.resolve(&canonical).unwrap();

        let again: Vec<String> = second
            .entities
            .iter()
            .map(|e| e.canonical_name.clone())
            .collect();
        prop_assert_eq!(again, canonical);
        prop_assert!(second.entities.iter().all(|e| e.aliases.is_empty()));
    }

    /// Property: every non-dropped mention is the name or an alias of exactly one entity
    #[test]
    fn test_every_mention_is_accounted_for(
        picks in proptest::collection::vec(0usize..6, 0..20)
    ) {
        let pool = ["Acme Inc.", "ACME", "Acme Corporation", "Globex", "Globex LLC", "..."];
        let mentions: Vec<String> = picks.iter().map(|&i| pool[i].to_string()).collect();

        let result = Deduplicator::default_config().resolve(&mentions).unwrap();
        for mention in &mentions {
            if result.dropped.contains(mention) {
                continue;
            }
            let owners = result.entities.iter().filter(|e| e.knows(mention)).count();
            prop_assert_eq!(owners, 1, "mention {} owned by {} entities", mention, owners);
        }
    }
}
