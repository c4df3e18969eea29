//! Retry and backoff behavior seen through the SourceClient interface

use std::time::{Duration, Instant};
use volt_domain::{CanonicalEntity, Confidence, RecordFields};
use volt_sources::{LookupError, LookupRequest, RetryPolicy, ScriptedSource, SourceClient};

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay_ms: 20,
        max_delay_ms: 200,
        max_total_wait_ms: 500,
        jitter: 0.25,
    }
}

fn website() -> RecordFields {
    RecordFields {
        website: Some("https://acme.example".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_transient_twice_then_success() {
    let policy = policy();
    let source = ScriptedSource::new("wikidata", Confidence::High)
        .fail("Acme", LookupError::Transient("HTTP 503".into()))
        .fail("Acme", LookupError::Transient("connection reset".into()))
        .respond("Acme", website())
        .with_retry(policy.clone());

    let request = LookupRequest::for_entity(&CanonicalEntity::new("Acme"));
    let start = Instant::now();
    let record = source.lookup(&request).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(record.fields.website.as_deref(), Some("https://acme.example"));
    assert_eq!(source.call_count(), 3);

    // Backoffs before jitter: 20ms then 40ms
    let minimum = policy.backoff(1) + policy.backoff(2);
    assert!(elapsed >= minimum, "elapsed {:?} < {:?}", elapsed, minimum);
    assert!(elapsed <= policy.max_total_wait() + Duration::from_millis(250));
}

#[tokio::test]
async fn test_rate_limit_honors_retry_after() {
    let source = ScriptedSource::new("wikipedia", Confidence::Medium)
        .fail("Acme", LookupError::RateLimited { retry_after: Duration::from_millis(120) })
        .respond("Acme", website())
        .with_retry(policy());

    let start = Instant::now();
    assert!(source.lookup(&LookupRequest::new("Acme")).await.is_ok());
    assert!(start.elapsed() >= Duration::from_millis(120));
}

#[tokio::test]
async fn test_exhausted_retries_surface_last_error() {
    let source = ScriptedSource::new("wikidata", Confidence::High)
        .fail("Acme", LookupError::Timeout)
        .with_retry(policy());

    let result = source.lookup(&LookupRequest::new("Acme")).await;
    assert_eq!(result, Err(LookupError::Timeout));
    assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let source = ScriptedSource::new("wikidata", Confidence::High).with_retry(policy());

    let result = source.lookup(&LookupRequest::new("Nobody")).await;
    assert_eq!(result, Err(LookupError::NotFound));
    assert_eq!(source.call_count(), 1);
}
