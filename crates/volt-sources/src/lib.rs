//! Volt Source Clients
//!
//! External metadata providers behind one polymorphic capability,
//! [`SourceClient`]. Every client owns its rate limiter, per-call timeout and
//! retry policy, passed in at construction.
//!
//! # Clients
//!
//! - [`WikidataClient`]: structured knowledge graph, confidence `High`
//! - [`WikipediaClient`]: encyclopedia summary, confidence `Medium`
//! - [`WebSearchClient`]: natural-language web search fallback, confidence `Low`
//! - [`ScriptedSource`]: deterministic double for tests
//!
//! # Examples
//!
//! ```
//! use volt_domain::{CanonicalEntity, Confidence, RecordFields};
//! use volt_sources::{LookupRequest, ScriptedSource, SourceClient};
//!
//! # tokio_test_block(async {
//! let source = ScriptedSource::new("wikidata", Confidence::High)
//!     .respond("Acme", RecordFields { website: Some("https://acme.example".into()), ..Default::default() });
//!
//! let request = LookupRequest::for_entity(&CanonicalEntity::new("Acme"));
//! let record = source.lookup(&request).await.unwrap();
//! assert_eq!(record.fields.website.as_deref(), Some("https://acme.example"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod limiter;
pub mod mock;
pub mod retry;
pub mod websearch;
pub mod wikidata;
pub mod wikipedia;

use async_trait::async_trait;
use volt_domain::{CanonicalEntity, Confidence, FieldName, PartialRecord, SourceId};

pub use config::{FallbackSettings, SourceSettings, SourcesConfig};
pub use error::LookupError;
pub use http::HttpFetcher;
pub use limiter::SourceLimiter;
pub use mock::ScriptedSource;
pub use retry::RetryPolicy;
pub use websearch::WebSearchClient;
pub use wikidata::WikidataClient;
pub use wikipedia::WikipediaClient;

/// Source id of the structured knowledge graph
pub const WIKIDATA_SOURCE: &str = "wikidata";

/// Source id of the encyclopedia summary
pub const WIKIPEDIA_SOURCE: &str = "wikipedia";

/// Source id of the natural-language fallback
pub const WEB_SEARCH_SOURCE: &str = "web_search";

/// What a source is asked to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Canonical name
    pub name: String,
    /// Other names to try, in order
    pub aliases: Vec<String>,
    /// Required fields still unknown (a hint; empty for primary lookups)
    pub missing: Vec<FieldName>,
}

impl LookupRequest {
    /// Request for a bare name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Request for a canonical entity and its aliases
    pub fn for_entity(entity: &CanonicalEntity) -> Self {
        Self {
            name: entity.canonical_name.clone(),
            aliases: entity.aliases.clone(),
            missing: Vec::new(),
        }
    }

    /// Attach the fields still missing
    pub fn with_missing(mut self, missing: Vec<FieldName>) -> Self {
        self.missing = missing;
        self
    }

    /// Canonical name first, then aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A metadata source
///
/// `lookup` either yields a record in the common field vocabulary or a
/// [`LookupError`]; `NotFound` is a legitimate empty result, not a failure.
/// Implementations apply their own rate limiting, timeouts and retries.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Stable source identifier, recorded in `sources`
    fn id(&self) -> SourceId;

    /// Static precedence used by the merger
    fn confidence(&self) -> Confidence;

    /// Look up a company by name and aliases
    async fn lookup(&self, request: &LookupRequest) -> Result<PartialRecord, LookupError>;
}
