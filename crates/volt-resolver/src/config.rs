//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Default fuzzy-match threshold on a 0-1 scale
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.88;

/// Default maximum mention length (characters)
pub const DEFAULT_MAX_MENTION_LENGTH: usize = 256;

/// Configuration for mention deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Minimum similarity for a mention to join an existing cluster
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,

    /// Longer mentions are treated as malformed extractor output
    #[serde(default = "default_max_mention_length")]
    pub max_mention_length: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_max_mention_length() -> usize {
    DEFAULT_MAX_MENTION_LENGTH
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_mention_length: DEFAULT_MAX_MENTION_LENGTH,
        }
    }
}

impl ResolverConfig {
    /// Configuration with a custom threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            similarity_threshold: threshold,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(format!(
                "similarity_threshold {} must be in (0.0, 1.0]",
                self.similarity_threshold
            ));
        }
        if self.max_mention_length == 0 {
            return Err("max_mention_length must be greater than 0".to_string());
        }
        Ok(())
    }
}
