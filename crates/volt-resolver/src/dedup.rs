//! Greedy fuzzy clustering of mentions into canonical entities

use crate::normalizer::{normalize, token_sorted};
use crate::{ResolverConfig, ResolverError};
use strsim::normalized_levenshtein;
use tracing::{debug, info};
use volt_domain::{CanonicalEntity, Mention};

/// Similarity of two normalized keys on a 0-1 scale
///
/// Takes the better of plain and token-sorted normalized Levenshtein, so
/// word-order variants ("Bank of America" / "America Bank of") still match.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let direct = normalized_levenshtein(a, b);
    let sorted = normalized_levenshtein(&token_sorted(a), &token_sorted(b));
    direct.max(sorted)
}

/// Output of resolving one mention sequence
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Canonical entities in order of first appearance
    pub entities: Vec<CanonicalEntity>,

    /// Mentions dropped because they normalized to an empty key
    pub dropped: Vec<Mention>,
}

/// A cluster under construction
struct Cluster {
    entity: CanonicalEntity,
    /// Normalized key of the current representative
    key: String,
    /// Length of the representative in characters
    representative_len: usize,
}

/// Clusters mentions that refer to the same company
///
/// Single left-to-right pass: each mention joins the existing cluster whose
/// representative key is most similar (first cluster on ties) if that score
/// reaches the threshold, otherwise it starts a new cluster. Deterministic for
/// a given input order; cost is O(n·k) for k clusters.
pub struct Deduplicator {
    config: ResolverConfig,
}

impl Deduplicator {
    /// Create a deduplicator, rejecting invalid configuration
    pub fn new(config: ResolverConfig) -> Result<Self, ResolverError> {
        config.validate().map_err(ResolverError::Config)?;
        Ok(Self { config })
    }

    /// Create a deduplicator with the default configuration
    pub fn default_config() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve mentions into canonical entities
    ///
    /// # Errors
    ///
    /// Returns an error if a mention is longer than `max_mention_length` or
    /// contains control characters; either means the extractor output is
    /// malformed and nothing should be emitted.
    pub fn resolve(&self, mentions: &[Mention]) -> Result<Resolution, ResolverError> {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut dropped = Vec::new();

        for (index, raw) in mentions.iter().enumerate() {
            let mention = raw.trim();
            self.check_mention(index, mention)?;

            let key = normalize(mention);
            if key.is_empty() {
                debug!("Dropping mention {} ({:?}): empty normalized key", index, raw);
                dropped.push(raw.clone());
                continue;
            }

            match best_match(&clusters, &key, self.config.similarity_threshold) {
                Some(position) => absorb(&mut clusters[position], mention, key),
                None => clusters.push(Cluster {
                    entity: CanonicalEntity::new(mention),
                    representative_len: mention.chars().count(),
                    key,
                }),
            }
        }

        info!(
            "Resolved {} mentions into {} entities ({} dropped)",
            mentions.len(),
            clusters.len(),
            dropped.len()
        );

        Ok(Resolution {
            entities: clusters.into_iter().map(|c| c.entity).collect(),
            dropped,
        })
    }

    fn check_mention(&self, index: usize, mention: &str) -> Result<(), ResolverError> {
        let length = mention.chars().count();
        if length > self.config.max_mention_length {
            return Err(ResolverError::MentionTooLong {
                index,
                length,
                max: self.config.max_mention_length,
            });
        }
        if mention.chars().any(char::is_control) {
            return Err(ResolverError::ControlCharacters { index });
        }
        Ok(())
    }
}

/// Index of the best-scoring cluster at or above `threshold`
fn best_match(clusters: &[Cluster], key: &str, threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (position, cluster) in clusters.iter().enumerate() {
        let score = similarity(key, &cluster.key);
        if score < threshold {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((position, score));
        }
    }
    best.map(|(position, _)| position)
}

/// Add a mention to a cluster, promoting it if it is the longest so far
fn absorb(cluster: &mut Cluster, mention: &str, key: String) {
    let len = mention.chars().count();
    if len > cluster.representative_len {
        debug!(
            "'{}' replaces '{}' as representative",
            mention, cluster.entity.canonical_name
        );
        cluster.entity.promote(mention);
        cluster.representative_len = len;
        cluster.key = key;
    } else {
        cluster.entity.add_alias(mention);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions(names: &[&str]) -> Vec<Mention> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("acme", "acme"), 1.0);
        assert_eq!(similarity("acme", ""), 0.0);
        assert!(similarity("microsoft", "microsft") >= 0.88);
        assert!(similarity("google", "microsoft") < 0.5);
    }

    #[test]
    fn test_similarity_ignores_word_order() {
        assert_eq!(similarity("bank of america", "america bank of"), 1.0);
    }

    #[test]
    fn test_acme_variants_cluster_to_longest() {
        let dedup = Deduplicator::default_config();
        let result = dedup
            .resolve(&mentions(&["Acme Inc.", "ACME", "Acme Corporation"]))
            .unwrap();

        assert_eq!(result.entities.len(), 1);
        let entity = &result.entities[0];
        assert_eq!(entity.canonical_name, "Acme Corporation");
        assert_eq!(entity.aliases, vec!["Acme Inc.", "ACME"]);
    }

    #[test]
    fn test_legal_suffix_variants_cluster() {
        let dedup = Deduplicator::default_config();
        let result = dedup
            .resolve(&mentions(&["Google", "Microsoft", "Google LLC", "Microsoft Corp."]))
            .unwrap();

        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.entities[0].canonical_name, "Google LLC");
        assert_eq!(result.entities[0].aliases, vec!["Google"]);
        assert_eq!(result.entities[1].canonical_name, "Microsoft Corp.");
    }

    #[test]
    fn test_tie_keeps_first_seen_representative() {
        let dedup = Deduplicator::default_config();
        let result = dedup.resolve(&mentions(&["Acme Inc", "ACME INC"])).unwrap();

        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].canonical_name, "Acme Inc");
        assert!(result.entities[0].aliases.is_empty());
    }

    #[test]
    fn test_typo_clusters_within_threshold() {
        let dedup = Deduplicator::default_config();
        let result = dedup.resolve(&mentions(&["Microsoft", "Microsft"])).unwrap();
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].aliases, vec!["Microsft"]);
    }

    #[test]
    fn test_distinct_companies_stay_apart() {
        let dedup = Deduplicator::default_config();
        let result = dedup
            .resolve(&mentions(&["Apple", "Apple Records Ltd", "Applied Materials"]))
            .unwrap();
        assert_eq!(result.entities.len(), 3);
    }

    #[test]
    fn test_empty_keys_are_dropped() {
        let dedup = Deduplicator::default_config();
        let result = dedup.resolve(&mentions(&["...", "Stripe", "   ", "--"])).unwrap();

        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.dropped.len(), 3);
    }

    #[test]
    fn test_overlong_mention_is_fatal() {
        let dedup = Deduplicator::new(ResolverConfig {
            max_mention_length: 10,
            ..ResolverConfig::default()
        })
        .unwrap();

        let err = dedup
            .resolve(&mentions(&["Stripe", "An Extremely Long Company Name"]))
            .unwrap_err();
        assert!(matches!(err, ResolverError::MentionTooLong { index: 1, .. }));
    }

    #[test]
    fn test_control_characters_are_fatal() {
        let dedup = Deduplicator::default_config();
        let err = dedup.resolve(&mentions(&["Acme\u{0}Corp"])).unwrap_err();
        assert_eq!(err, ResolverError::ControlCharacters { index: 0 });
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(Deduplicator::new(ResolverConfig::with_threshold(0.0)).is_err());
    }

    #[test]
    fn test_empty_input() {
        let result = Deduplicator::default_config().resolve(&[]).unwrap();
        assert!(result.entities.is_empty());
        assert!(result.dropped.is_empty());
    }
}
