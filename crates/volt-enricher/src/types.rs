//! Outcome and report types for enrichment runs

use serde::{Serialize, Serializer};
use std::fmt;
use volt_domain::{CanonicalEntity, EnrichedCompany, EntityId, FieldName, Mention, SourceId};
use volt_sources::LookupError;
use volt_validator::{CompanyProfile, ValidationWarning};

/// What happened when one source was asked about one entity
///
/// Serializes as its display string.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    /// The source returned a record providing these required fields
    Contributed(Vec<FieldName>),
    /// The source has no matching entity
    NotFound,
    /// The lookup failed after retries
    Failed(LookupError),
    /// The source was not asked
    Skipped(String),
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Contributed(fields) if fields.is_empty() => f.write_str("no required fields"),
            SourceStatus::Contributed(fields) => {
                let names: Vec<&str> = fields.iter().map(FieldName::as_str).collect();
                write!(f, "contributed {}", names.join(", "))
            }
            SourceStatus::NotFound => f.write_str("not found"),
            SourceStatus::Failed(error) => write!(f, "{}", error.kind()),
            SourceStatus::Skipped(reason) => write!(f, "skipped ({})", reason),
        }
    }
}

impl Serialize for SourceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One source's attempt for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAttempt {
    /// Which source
    pub source: SourceId,
    /// How it went
    pub status: SourceStatus,
    /// Wall time spent, retries included (milliseconds)
    pub elapsed_ms: u64,
}

impl SourceAttempt {
    /// A source that was not asked
    pub fn skipped(source: SourceId, reason: impl Into<String>) -> Self {
        Self {
            source,
            status: SourceStatus::Skipped(reason.into()),
            elapsed_ms: 0,
        }
    }
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.status)
    }
}

/// Result of one entity flow
#[derive(Debug, Clone)]
pub struct EntityOutcome {
    /// The entity as resolved
    pub entity: CanonicalEntity,
    /// Merged record, before validation
    pub company: EnrichedCompany,
    /// Per-source attempts, in call order
    pub attempts: Vec<SourceAttempt>,
    /// Flow duration (milliseconds)
    pub elapsed_ms: u64,
}

impl EntityOutcome {
    /// Outcome carrying only the entity's names
    pub fn degraded(entity: CanonicalEntity, attempts: Vec<SourceAttempt>) -> Self {
        Self {
            company: EnrichedCompany::from_entity(&entity),
            entity,
            attempts,
            elapsed_ms: 0,
        }
    }

    /// Best-effort availability summary, e.g. "wikidata: not found; wikipedia: timeout"
    pub fn availability(&self) -> String {
        self.attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Per-entity section of the run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    /// Entity id
    #[serde(rename = "id")]
    pub entity_id: EntityId,
    /// Canonical name
    pub name: String,
    /// Final aliases
    pub aliases: Vec<String>,
    /// Per-source attempts
    #[serde(rename = "sources")]
    pub attempts: Vec<SourceAttempt>,
    /// Required fields emitted with the unknown sentinel
    pub unresolved: Vec<FieldName>,
    /// Flow duration (milliseconds)
    pub elapsed_ms: u64,
}

/// Summary of a whole run
///
/// Serializes to the machine-readable report written by `--report json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Mentions received
    #[serde(rename = "mentions")]
    pub mention_count: usize,
    /// Mentions dropped for normalizing to nothing
    pub dropped_mentions: Vec<Mention>,
    /// One entry per emitted company, in output order
    pub entities: Vec<EntityReport>,
    /// Every validation warning
    pub warnings: Vec<ValidationWarning>,
    /// Run duration (milliseconds)
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Entities with every required field resolved
    pub fn complete_count(&self) -> usize {
        self.entities.iter().filter(|e| e.unresolved.is_empty()).count()
    }
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Validated companies, in first-appearance order
    pub companies: Vec<CompanyProfile>,
    /// Run summary
    pub report: RunReport,
}
