//! Source client configuration

use crate::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Anthropic model for the web-search fallback
pub const DEFAULT_FALLBACK_MODEL: &str = "claude-3-5-haiku-latest";

/// Default environment variable holding the Anthropic API key
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Pacing, timeout and retry settings for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Deadline for a single network call (milliseconds)
    pub timeout_ms: u64,

    /// Sustained request rate shared by all entity flows
    pub requests_per_second: u32,

    /// Requests allowed in a burst
    pub burst: u32,

    /// Retry policy around each call
    pub retry: RetryPolicy,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            requests_per_second: 5,
            burst: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl SourceSettings {
    /// Per-call deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the settings, prefixing errors with `label`
    pub fn validate(&self, label: &str) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err(format!("{}.timeout_ms must be greater than 0", label));
        }
        if self.requests_per_second == 0 {
            return Err(format!("{}.requests_per_second must be greater than 0", label));
        }
        if self.burst == 0 {
            return Err(format!("{}.burst must be greater than 0", label));
        }
        self.retry
            .validate()
            .map_err(|e| format!("{}.retry: {}", label, e))
    }
}

/// Settings for the natural-language web-search fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    /// Deadline for a single call (milliseconds); searches are slow
    pub timeout_ms: u64,

    /// Sustained request rate shared by all entity flows
    pub requests_per_second: u32,

    /// Requests allowed in a burst
    pub burst: u32,

    /// Model answering the search
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Maximum web searches per lookup
    pub max_searches: u32,

    /// Retry policy around each call
    pub retry: RetryPolicy,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            requests_per_second: 1,
            burst: 2,
            model: DEFAULT_FALLBACK_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_searches: 3,
            retry: RetryPolicy::default(),
        }
    }
}

impl FallbackSettings {
    /// Pacing, timeout and retry as plain source settings
    pub fn source(&self) -> SourceSettings {
        SourceSettings {
            timeout_ms: self.timeout_ms,
            requests_per_second: self.requests_per_second,
            burst: self.burst,
            retry: self.retry.clone(),
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        self.source().validate("fallback")?;
        if self.model.trim().is_empty() {
            return Err("fallback.model cannot be empty".to_string());
        }
        if self.api_key_env.trim().is_empty() {
            return Err("fallback.api_key_env cannot be empty".to_string());
        }
        if self.max_searches == 0 {
            return Err("fallback.max_searches must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Configuration for all source clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Structured knowledge graph (Wikidata)
    pub structured: SourceSettings,

    /// Encyclopedia summary (Wikipedia)
    pub encyclopedia: SourceSettings,

    /// Natural-language web-search fallback
    pub fallback: FallbackSettings,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            structured: SourceSettings::default(),
            encyclopedia: SourceSettings::default(),
            fallback: FallbackSettings::default(),
        }
    }
}

impl SourcesConfig {
    /// Validate every source's settings
    pub fn validate(&self) -> Result<(), String> {
        self.structured.validate("structured")?;
        self.encyclopedia.validate("encyclopedia")?;
        self.fallback.validate()?;
        if self.user_agent.trim().is_empty() {
            return Err("user_agent cannot be empty".to_string());
        }
        Ok(())
    }

    /// Apply the same retry policy to every source
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.structured.retry = retry.clone();
        self.encyclopedia.retry = retry.clone();
        self.fallback.retry = retry;
        self
    }
}

/// `volt/<version>` user agent
pub fn default_user_agent() -> String {
    format!("volt/{}", env!("CARGO_PKG_VERSION"))
}
