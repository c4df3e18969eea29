//! Configuration for the enrichment run

use serde::{Deserialize, Serialize};
use std::time::Duration;
use volt_domain::FieldName;
use volt_resolver::ResolverConfig;
use volt_sources::{RetryPolicy, SourcesConfig};
use volt_validator::ValidationConfig;

/// Upper bound on `max_concurrent_entities`
pub const MAX_CONCURRENT_ENTITIES: usize = 1024;

/// When the natural-language fallback runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTrigger {
    /// Any required field still missing after the primary sources
    #[default]
    AnyRequiredMissing,
    /// Only when the website is still unknown
    WebsiteMissing,
}

impl FallbackTrigger {
    /// Whether the fallback should run for this missing-field set
    pub fn should_run(&self, missing: &[FieldName]) -> bool {
        match self {
            FallbackTrigger::AnyRequiredMissing => !missing.is_empty(),
            FallbackTrigger::WebsiteMissing => missing.contains(&FieldName::Website),
        }
    }
}

/// Configuration for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Entity flows allowed to run at once
    pub max_concurrent_entities: usize,

    /// Overall deadline for one source lookup, retries included (milliseconds)
    pub lookup_timeout_ms: u64,

    /// Whether the natural-language fallback may run
    pub fallback_enabled: bool,

    /// Condition for running the fallback
    pub fallback_trigger: FallbackTrigger,

    /// Mention resolution
    pub resolver: ResolverConfig,

    /// Source clients
    pub sources: SourcesConfig,

    /// Output validation
    pub validation: ValidationConfig,
}

impl EnricherConfig {
    /// Lookup deadline as a Duration
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_entities == 0 {
            return Err("max_concurrent_entities must be greater than 0".to_string());
        }
        if self.max_concurrent_entities > MAX_CONCURRENT_ENTITIES {
            return Err(format!(
                "max_concurrent_entities must be at most {}, got {}",
                MAX_CONCURRENT_ENTITIES, self.max_concurrent_entities
            ));
        }
        if self.lookup_timeout_ms == 0 {
            return Err("lookup_timeout_ms must be greater than 0".to_string());
        }
        self.resolver
            .validate()
            .map_err(|e| format!("resolver: {}", e))?;
        self.sources
            .validate()
            .map_err(|e| format!("sources: {}", e))?;
        Ok(())
    }
}

impl Default for EnricherConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_concurrent_entities: 8,
            lookup_timeout_ms: 30_000,
            fallback_enabled: false,
            fallback_trigger: FallbackTrigger::AnyRequiredMissing,
            resolver: ResolverConfig::default(),
            sources: SourcesConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl EnricherConfig {
    /// Aggressive preset: more concurrency, short timeouts, fewer retries
    pub fn aggressive() -> Self {
        let mut sources = SourcesConfig::default().with_retry(RetryPolicy {
            max_attempts: 2,
            base_delay_ms: 250,
            max_delay_ms: 2_000,
            max_total_wait_ms: 4_000,
            jitter: 0.25,
        });
        sources.structured.timeout_ms = 5_000;
        sources.encyclopedia.timeout_ms = 5_000;
        sources.fallback.timeout_ms = 30_000;

        Self {
            max_concurrent_entities: 16,
            lookup_timeout_ms: 10_000,
            sources,
            ..Self::default()
        }
    }

    /// Lenient preset: long timeouts and patient retries for flaky networks
    pub fn lenient() -> Self {
        let mut sources = SourcesConfig::default().with_retry(RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 16_000,
            max_total_wait_ms: 60_000,
            jitter: 0.25,
        });
        sources.structured.timeout_ms = 30_000;
        sources.encyclopedia.timeout_ms = 30_000;
        sources.fallback.timeout_ms = 120_000;

        Self {
            max_concurrent_entities: 4,
            lookup_timeout_ms: 120_000,
            sources,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EnricherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrent_entities, 8);
        assert_eq!(config.resolver.similarity_threshold, 0.88);
        assert!(!config.fallback_enabled);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(EnricherConfig::aggressive().validate().is_ok());
        assert!(EnricherConfig::lenient().validate().is_ok());
        assert!(
            EnricherConfig::aggressive().sources.structured.retry.max_attempts
                < EnricherConfig::lenient().sources.structured.retry.max_attempts
        );
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = EnricherConfig {
            max_concurrent_entities: 0,
            ..EnricherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_concurrency_rejected() {
        let config = EnricherConfig::from_toml("max_concurrent_entities = 9000000000000000000").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("at most 1024"), "{}", err);

        let config = EnricherConfig {
            max_concurrent_entities: MAX_CONCURRENT_ENTITIES,
            ..EnricherConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = EnricherConfig {
            resolver: ResolverConfig::with_threshold(1.5),
            ..EnricherConfig::default()
        };
        assert!(config.validate().unwrap_err().starts_with("resolver:"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EnricherConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = EnricherConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EnricherConfig::from_toml(
            r#"
            max_concurrent_entities = 2
            fallback_enabled = true
            fallback_trigger = "website_missing"

            [resolver]
            similarity_threshold = 0.9

            [sources.encyclopedia.retry]
            max_attempts = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.max_concurrent_entities, 2);
        assert_eq!(config.fallback_trigger, FallbackTrigger::WebsiteMissing);
        assert_eq!(config.resolver.similarity_threshold, 0.9);
        assert_eq!(config.resolver.max_mention_length, 256);
        assert_eq!(config.sources.encyclopedia.retry.max_attempts, 4);
        assert_eq!(config.sources.encyclopedia.retry.base_delay_ms, 500);
        assert_eq!(config.lookup_timeout_ms, 30_000);
    }

    #[test]
    fn test_fallback_trigger() {
        let missing = [FieldName::Sector];
        assert!(FallbackTrigger::AnyRequiredMissing.should_run(&missing));
        assert!(!FallbackTrigger::WebsiteMissing.should_run(&missing));
        assert!(FallbackTrigger::WebsiteMissing.should_run(&[FieldName::Website]));
        assert!(!FallbackTrigger::AnyRequiredMissing.should_run(&[]));
    }
}
