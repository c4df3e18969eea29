//! Per-source request pacing shared by every entity flow

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Shared token-bucket limiter for one source
///
/// Cloning yields another handle onto the same bucket, so every flow that
/// talks to a source draws from a single budget.
#[derive(Clone)]
pub struct SourceLimiter {
    inner: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    per_second: NonZeroU32,
}

impl SourceLimiter {
    /// Limiter allowing `per_second` requests with bursts of `burst`
    ///
    /// Zero values are clamped to one; configuration validation rejects them
    /// before this point.
    pub fn new(per_second: u32, burst: u32) -> Self {
        let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        Self {
            inner: Arc::new(RateLimiter::direct(
                Quota::per_second(per_second).allow_burst(burst),
            )),
            per_second,
        }
    }

    /// Wait until a request may be sent
    pub async fn acquire(&self) {
        self.inner.until_ready().await;
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }

    /// Configured sustained rate
    pub fn per_second(&self) -> u32 {
        self.per_second.get()
    }
}

impl std::fmt::Debug for SourceLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceLimiter")
            .field("per_second", &self.per_second)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_refuse() {
        let limiter = SourceLimiter::new(1, 2);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_clones_share_one_bucket() {
        let limiter = SourceLimiter::new(1, 1);
        let other = limiter.clone();
        assert!(limiter.try_acquire());
        assert!(!other.try_acquire());
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        assert_eq!(SourceLimiter::new(0, 0).per_second(), 1);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        let limiter = SourceLimiter::new(20, 1);
        limiter.acquire().await;
        let start = std::time::Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= std::time::Duration::from_millis(30));
    }
}
