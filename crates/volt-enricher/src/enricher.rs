//! Enrichment orchestrator

use crate::config::EnricherConfig;
use crate::error::EnricherError;
use crate::merger::merge;
use crate::types::{EntityOutcome, SourceAttempt, SourceStatus};
use crate::CancelFlag;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use volt_domain::{CanonicalEntity, PartialRecord};
use volt_sources::{
    LookupError, LookupRequest, SourceClient, WebSearchClient, WikidataClient, WikipediaClient,
};

/// The clients an enricher consults
#[derive(Clone)]
pub struct SourceSet {
    /// Structured knowledge graph, asked first
    pub structured: Arc<dyn SourceClient>,
    /// Encyclopedia summary, asked alongside the structured source
    pub encyclopedia: Arc<dyn SourceClient>,
    /// Natural-language fallback, asked afterwards if fields are missing
    pub fallback: Option<Arc<dyn SourceClient>>,
}

impl SourceSet {
    /// The two primary sources, no fallback
    pub fn new(structured: Arc<dyn SourceClient>, encyclopedia: Arc<dyn SourceClient>) -> Self {
        Self {
            structured,
            encyclopedia,
            fallback: None,
        }
    }

    /// Add a fallback source
    pub fn with_fallback(mut self, fallback: Arc<dyn SourceClient>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Build the network clients described by `config`
    ///
    /// # Errors
    ///
    /// Returns `Config` if a client cannot be built, including when the
    /// fallback is enabled but its API key is not set.
    pub fn from_config(config: &EnricherConfig) -> Result<Self, EnricherError> {
        let sources = &config.sources;
        let structured = WikidataClient::new(&sources.structured, &sources.user_agent)
            .map_err(|e| EnricherError::Config(format!("wikidata client: {}", e)))?;
        let encyclopedia = WikipediaClient::new(&sources.encyclopedia, &sources.user_agent)
            .map_err(|e| EnricherError::Config(format!("wikipedia client: {}", e)))?;

        let set = Self::new(Arc::new(structured), Arc::new(encyclopedia));
        if !config.fallback_enabled {
            return Ok(set);
        }

        let fallback = WebSearchClient::new(&sources.fallback, &sources.user_agent).map_err(|e| {
            EnricherError::Config(format!("web search fallback enabled but unusable: {}", e))
        })?;
        Ok(set.with_fallback(Arc::new(fallback)))
    }
}

struct Inner {
    sources: SourceSet,
    config: EnricherConfig,
    permits: Arc<Semaphore>,
}

/// Runs one flow per entity under a global concurrency limit
///
/// Within a flow the structured and encyclopedia sources are asked
/// concurrently, each under the lookup deadline; the fallback, when enabled
/// and triggered, runs afterwards with the missing fields as a hint. Source
/// failures stay inside the flow and never affect other entities.
#[derive(Clone)]
pub struct Enricher {
    inner: Arc<Inner>,
}

impl Enricher {
    /// Create an enricher over explicit sources
    ///
    /// A fallback in `sources` is only consulted when `fallback_enabled` is set.
    pub fn new(sources: SourceSet, config: EnricherConfig) -> Result<Self, EnricherError> {
        config.validate().map_err(EnricherError::Config)?;
        Ok(Self {
            inner: Arc::new(Inner {
                permits: Arc::new(Semaphore::new(config.max_concurrent_entities)),
                sources,
                config,
            }),
        })
    }

    /// Create an enricher with the network clients described by `config`
    pub fn from_config(config: EnricherConfig) -> Result<Self, EnricherError> {
        config.validate().map_err(EnricherError::Config)?;
        let sources = SourceSet::from_config(&config)?;
        Self::new(sources, config)
    }

    /// Active configuration
    pub fn config(&self) -> &EnricherConfig {
        &self.inner.config
    }

    /// Enrich every entity, preserving input order
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` was raised before the run finished.
    pub async fn enrich_all(
        &self,
        entities: Vec<CanonicalEntity>,
        cancel: &CancelFlag,
    ) -> Result<Vec<EntityOutcome>, EnricherError> {
        info!(
            "Enriching {} entities ({} at a time)",
            entities.len(),
            self.inner.config.max_concurrent_entities
        );

        let handles: Vec<_> = entities
            .iter()
            .cloned()
            .map(|entity| {
                let inner = Arc::clone(&self.inner);
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    let _permit = match Arc::clone(&inner.permits).acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            let attempts = inner.skip_all("concurrency limiter closed");
                            return EntityOutcome::degraded(entity, attempts);
                        }
                    };
                    inner.enrich_one(entity, &cancel).await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, entity) in handles.into_iter().zip(entities) {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!("Flow for '{}' aborted: {}", entity.canonical_name, e);
                    let attempts = self.inner.skip_all("entity flow aborted");
                    outcomes.push(EntityOutcome::degraded(entity, attempts));
                }
            }
        }

        if cancel.is_cancelled() {
            warn!("Run cancelled, discarding {} outcomes", outcomes.len());
            return Err(EnricherError::Cancelled);
        }
        Ok(outcomes)
    }

    /// Enrich a single entity
    pub async fn enrich_one(&self, entity: CanonicalEntity, cancel: &CancelFlag) -> EntityOutcome {
        self.inner.enrich_one(entity, cancel).await
    }
}

impl Inner {
    async fn enrich_one(&self, entity: CanonicalEntity, cancel: &CancelFlag) -> EntityOutcome {
        if cancel.is_cancelled() {
            debug!("Skipping '{}': run cancelled", entity.canonical_name);
            return EntityOutcome::degraded(entity, self.skip_all("run cancelled"));
        }

        let start = Instant::now();
        let request = LookupRequest::for_entity(&entity);
        info!("Enriching '{}' ({} aliases)", entity.canonical_name, entity.aliases.len());

        let (structured, encyclopedia) = tokio::join!(
            self.attempt(self.sources.structured.as_ref(), &request),
            self.attempt(self.sources.encyclopedia.as_ref(), &request),
        );

        let mut attempts = Vec::with_capacity(3);
        let mut records: Vec<PartialRecord> = Vec::with_capacity(3);
        for (attempt, record) in [structured, encyclopedia] {
            attempts.push(attempt);
            records.extend(record);
        }

        let mut company = merge(&entity, &records);
        let missing = company.missing_required();

        if let Some(fallback) = self.enabled_fallback() {
            let trigger = self.config.fallback_trigger;
            if cancel.is_cancelled() {
                attempts.push(SourceAttempt::skipped(fallback.id(), "run cancelled"));
            } else if !trigger.should_run(&missing) {
                attempts.push(SourceAttempt::skipped(fallback.id(), "not needed"));
            } else {
                debug!(
                    "'{}' still missing {:?}, asking {}",
                    entity.canonical_name,
                    missing,
                    fallback.id()
                );
                let hinted = request.clone().with_missing(missing);
                let (attempt, record) = self.attempt(fallback.as_ref(), &hinted).await;
                attempts.push(attempt);
                if let Some(record) = record {
                    records.push(record);
                    company = merge(&entity, &records);
                }
            }
        }

        let elapsed_ms = elapsed_ms(start.elapsed());
        info!(
            "Enriched '{}' in {}ms ({} of {} sources contributed, {} required fields missing)",
            entity.canonical_name,
            elapsed_ms,
            records.len(),
            attempts.len(),
            company.missing_required().len()
        );

        EntityOutcome {
            entity,
            company,
            attempts,
            elapsed_ms,
        }
    }

    /// One source lookup under the lookup deadline, never failing the flow
    async fn attempt(
        &self,
        source: &dyn SourceClient,
        request: &LookupRequest,
    ) -> (SourceAttempt, Option<PartialRecord>) {
        let id = source.id();
        let start = Instant::now();
        let result = match timeout(self.config.lookup_timeout(), source.lookup(request)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout),
        };
        let elapsed_ms = elapsed_ms(start.elapsed());

        let (status, record) = match result {
            Ok(record) => {
                let provided = record.fields.provided();
                debug!("{} contributed {:?} for '{}'", id, provided, request.name);
                (SourceStatus::Contributed(provided), Some(record))
            }
            Err(LookupError::NotFound) => {
                debug!("{} has no entry for '{}'", id, request.name);
                (SourceStatus::NotFound, None)
            }
            Err(e) => {
                warn!("{} failed for '{}': {}", id, request.name, e);
                (SourceStatus::Failed(e), None)
            }
        };

        (
            SourceAttempt {
                source: id,
                status,
                elapsed_ms,
            },
            record,
        )
    }

    fn enabled_fallback(&self) -> Option<&Arc<dyn SourceClient>> {
        if self.config.fallback_enabled {
            self.sources.fallback.as_ref()
        } else {
            None
        }
    }

    fn skip_all(&self, reason: &str) -> Vec<SourceAttempt> {
        let mut attempts = vec![
            SourceAttempt::skipped(self.sources.structured.id(), reason),
            SourceAttempt::skipped(self.sources.encyclopedia.id(), reason),
        ];
        if let Some(fallback) = self.enabled_fallback() {
            attempts.push(SourceAttempt::skipped(fallback.id(), reason));
        }
        attempts
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
