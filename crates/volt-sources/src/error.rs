//! Lookup error taxonomy

use std::time::Duration;
use thiserror::Error;

/// Errors a source lookup can produce
///
/// None of these abort an entity's enrichment: the orchestrator converts them
/// into "this source contributed nothing".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The source has no matching entity (a legitimate empty result)
    #[error("Not found")]
    NotFound,

    /// The source asked us to slow down
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Minimum wait requested by the source
        retry_after: Duration,
    },

    /// A network call exceeded its deadline
    #[error("Timed out")]
    Timeout,

    /// Network failure or 5xx; worth retrying
    #[error("Transient error: {0}")]
    Transient(String),

    /// 4xx (other than rate limiting) or an unusable response; not retryable
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl LookupError {
    /// Whether the retry policy should try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LookupError::RateLimited { .. } | LookupError::Timeout | LookupError::Transient(_)
        )
    }

    /// Short label for reports
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::NotFound => "not found",
            LookupError::RateLimited { .. } => "rate limited",
            LookupError::Timeout => "timeout",
            LookupError::Transient(_) => "transient",
            LookupError::Fatal(_) => "fatal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(LookupError::Timeout.is_retryable());
        assert!(LookupError::Transient("503".into()).is_retryable());
        assert!(LookupError::RateLimited { retry_after: Duration::from_secs(1) }.is_retryable());
        assert!(!LookupError::NotFound.is_retryable());
        assert!(!LookupError::Fatal("400".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(LookupError::Transient("HTTP 502".into()).to_string(), "Transient error: HTTP 502");
        assert_eq!(LookupError::Timeout.kind(), "timeout");
    }
}
