//! Retry with exponential backoff and jitter

use crate::LookupError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of attempts (first call included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Retry policy for one source
///
/// Delay after the n-th failed attempt is `min(base · 2^(n-1), max_delay)`
/// plus uniform jitter in `[0, jitter · delay]`. A `RateLimited` error waits
/// at least its `retry_after`. Retrying stops once attempts are exhausted or
/// the next sleep would push the cumulative wait past `max_total_wait_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first
    pub max_attempts: u32,

    /// Backoff before the second attempt (milliseconds)
    pub base_delay_ms: u64,

    /// Cap on a single backoff (milliseconds)
    pub max_delay_ms: u64,

    /// Cap on total time spent sleeping between attempts (milliseconds)
    pub max_total_wait_ms: u64,

    /// Jitter as a fraction of the backoff, in [0.0, 1.0]
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            max_total_wait_ms: 20_000,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err("base_delay_ms cannot exceed max_delay_ms".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(format!("jitter {} must be in [0.0, 1.0]", self.jitter));
        }
        Ok(())
    }

    /// Total wait budget
    pub fn max_total_wait(&self) -> Duration {
        Duration::from_millis(self.max_total_wait_ms)
    }

    /// Backoff after `failed_attempts` failures, before jitter
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(31);
        let delay = self.base_delay_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Sleep to take after a failed attempt, jitter included
    pub fn delay_after(&self, failed_attempts: u32, error: &LookupError) -> Duration {
        let backoff = self.backoff(failed_attempts);
        let spread = backoff.as_millis() as f64 * self.jitter;
        let jitter = if spread > 0.0 {
            Duration::from_millis(rand::thread_rng().gen_range(0.0..=spread) as u64)
        } else {
            Duration::ZERO
        };
        let delay = backoff + jitter;
        match error {
            LookupError::RateLimited { retry_after } => delay.max(*retry_after),
            _ => delay,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or the budget runs out
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// when retries are exhausted.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, LookupError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let mut waited = Duration::ZERO;
        let mut attempt = 1;

        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if attempt >= self.max_attempts {
                warn!("{}: giving up after {} attempts: {}", label, attempt, error);
                return Err(error);
            }

            let delay = self.delay_after(attempt, &error);
            if waited + delay > self.max_total_wait() {
                warn!(
                    "{}: retry budget of {:?} exhausted after {} attempts: {}",
                    label,
                    self.max_total_wait(),
                    attempt,
                    error
                );
                return Err(error);
            }

            debug!(
                "{}: attempt {} failed ({}), retrying in {:?}",
                label, attempt, error, delay
            );
            tokio::time::sleep(delay).await;
            waited += delay;
            attempt += 1;
        }
    }
}
