//! Scripted source client for deterministic testing
//!
//! No network calls: each lookup replays the next scripted outcome for the
//! requested name. Retry policy and artificial latency behave like the real
//! clients, so orchestration (isolation, timeouts, retries) can be tested.

use crate::{LookupError, LookupRequest, RetryPolicy, SourceClient};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use volt_domain::{Confidence, PartialRecord, RecordFields, SourceId};

/// One scripted attempt result
pub type Outcome = Result<RecordFields, LookupError>;

/// Source client replaying scripted outcomes per entity name
///
/// # Examples
///
/// ```
/// use volt_domain::{Confidence, RecordFields};
/// use volt_sources::{LookupError, ScriptedSource};
///
/// let source = ScriptedSource::new("wikidata", Confidence::High)
///     .respond("Acme", RecordFields { sector: Some("Anvils".into()), ..Default::default() })
///     .fail("Globex", LookupError::Fatal("HTTP 403".into()));
/// assert_eq!(source.call_count(), 0);
/// ```
pub struct ScriptedSource {
    id: SourceId,
    confidence: Confidence,
    scripts: Mutex<HashMap<String, VecDeque<Outcome>>>,
    otherwise: Outcome,
    latency: Option<Duration>,
    retry: RetryPolicy,
    calls: AtomicUsize,
    requests: Mutex<Vec<LookupRequest>>,
}

impl ScriptedSource {
    /// Source that answers `NotFound` for every name and never retries
    pub fn new(id: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            id: SourceId::new(id),
            confidence,
            scripts: Mutex::new(HashMap::new()),
            otherwise: Err(LookupError::NotFound),
            latency: None,
            retry: RetryPolicy::none(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue an outcome for `name`
    ///
    /// Outcomes replay in order; the last one repeats once the queue drains.
    pub fn push(mut self, name: &str, outcome: Outcome) -> Self {
        self.scripts
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key(name))
            .or_default()
            .push_back(outcome);
        self
    }

    /// Answer `name` with `fields`
    pub fn respond(self, name: &str, fields: RecordFields) -> Self {
        self.push(name, Ok(fields))
    }

    /// Fail lookups of `name` with `error`
    pub fn fail(self, name: &str, error: LookupError) -> Self {
        self.push(name, Err(error))
    }

    /// Outcome for names without a script
    pub fn otherwise(mut self, outcome: Outcome) -> Self {
        self.otherwise = outcome;
        self
    }

    /// Sleep this long in every attempt
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Retry failed attempts like a network client would
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attempts made so far, retries included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, one per lookup
    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_outcome(&self, name: &str) -> Outcome {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        match scripts.get_mut(&key(name)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| self.otherwise.clone()),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| self.otherwise.clone()),
            None => self.otherwise.clone(),
        }
    }

    async fn attempt(&self, name: &str) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.next_outcome(name)
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[async_trait]
impl SourceClient for ScriptedSource {
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    fn confidence(&self) -> Confidence {
        self.confidence
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<PartialRecord, LookupError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let label = self.id.to_string();
        let fields = self
            .retry
            .execute(&label, |_| self.attempt(&request.name))
            .await?;
        Ok(PartialRecord::new(self.id(), self.confidence, fields))
    }
}
