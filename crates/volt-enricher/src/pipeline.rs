//! Run-level pipeline: resolve, enrich, validate

use crate::config::EnricherConfig;
use crate::enricher::{Enricher, SourceSet};
use crate::error::EnricherError;
use crate::types::{EntityReport, RunOutput, RunReport};
use crate::CancelFlag;
use std::time::Instant;
use tracing::{info, warn};
use volt_domain::Mention;
use volt_resolver::Deduplicator;
use volt_validator::SchemaValidator;

/// Ties the deduplicator, enricher and validator into one run
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use volt_domain::{Confidence, RecordFields};
/// use volt_enricher::{CancelFlag, EnricherConfig, Pipeline, SourceSet};
/// use volt_sources::ScriptedSource;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let structured = ScriptedSource::new("wikidata", Confidence::High).respond(
///     "Acme Corporation",
///     RecordFields { website: Some("https://acme.example".into()), ..Default::default() },
/// );
/// let encyclopedia = ScriptedSource::new("wikipedia", Confidence::Medium);
/// let sources = SourceSet::new(Arc::new(structured), Arc::new(encyclopedia));
///
/// let pipeline = Pipeline::new(EnricherConfig::default(), sources)?;
/// let mentions = vec!["Acme Inc.".to_string(), "Acme Corporation".to_string()];
/// let output = pipeline.run(&mentions, &CancelFlag::new()).await?;
///
/// assert_eq!(output.companies.len(), 1);
/// assert_eq!(output.companies[0].name, "Acme Corporation");
/// assert_eq!(output.companies[0].website, "https://acme.example");
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    deduplicator: Deduplicator,
    enricher: Enricher,
    validator: SchemaValidator,
}

impl Pipeline {
    /// Create a pipeline over explicit sources
    pub fn new(config: EnricherConfig, sources: SourceSet) -> Result<Self, EnricherError> {
        let deduplicator = Deduplicator::new(config.resolver.clone())?;
        let validator = SchemaValidator::new(config.validation.clone())?;
        let enricher = Enricher::new(sources, config)?;
        Ok(Self {
            deduplicator,
            enricher,
            validator,
        })
    }

    /// Create a pipeline with the network clients described by `config`
    pub fn from_config(config: EnricherConfig) -> Result<Self, EnricherError> {
        config.validate().map_err(EnricherError::Config)?;
        let sources = SourceSet::from_config(&config)?;
        Self::new(config, sources)
    }

    /// Active configuration
    pub fn config(&self) -> &EnricherConfig {
        self.enricher.config()
    }

    /// Run the whole pipeline over extractor output
    ///
    /// Mentions must be in order of appearance. Per-source failures degrade
    /// individual records; only structural problems, cancellation and
    /// contract violations are returned as errors, in which case nothing
    /// should be emitted.
    pub async fn run(
        &self,
        mentions: &[Mention],
        cancel: &CancelFlag,
    ) -> Result<RunOutput, EnricherError> {
        let start = Instant::now();
        info!("Starting run over {} mentions", mentions.len());

        let resolution = self.deduplicator.resolve(mentions)?;
        if !resolution.dropped.is_empty() {
            warn!(
                "Dropped {} mentions that normalized to nothing",
                resolution.dropped.len()
            );
        }

        let outcomes = self
            .enricher
            .enrich_all(resolution.entities, cancel)
            .await?;

        let mut companies = Vec::with_capacity(outcomes.len());
        let mut entities = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();

        for outcome in outcomes {
            let validated = self
                .validator
                .validate(&outcome.company, &outcome.availability());
            entities.push(EntityReport {
                entity_id: outcome.entity.id,
                name: validated.profile.name.clone(),
                aliases: validated.profile.aliases.clone(),
                unresolved: validated.warnings.iter().map(|w| w.field).collect(),
                attempts: outcome.attempts,
                elapsed_ms: outcome.elapsed_ms,
            });
            warnings.extend(validated.warnings);
            companies.push(validated.profile);
        }

        self.validator.check_profiles(&companies)?;

        let report = RunReport {
            mention_count: mentions.len(),
            dropped_mentions: resolution.dropped,
            entities,
            warnings,
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            "Run finished in {}ms: {} companies ({} complete), {} warnings",
            report.elapsed_ms,
            companies.len(),
            report.complete_count(),
            report.warnings.len()
        );

        Ok(RunOutput { companies, report })
    }
}
