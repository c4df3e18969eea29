//! Volt Enricher
//!
//! Turns canonical entities into merged company records by consulting the
//! metadata sources, and ties the whole run together.
//!
//! # Architecture
//!
//! ```text
//! mentions → Deduplicator → entities → Enricher ─┬─ structured  ┐ (concurrent)
//!                                                ├─ encyclopedia ┘
//!                                                └─ fallback (if enabled and fields missing)
//!                                       → merge → SchemaValidator → companies + report
//! ```
//!
//! # Key Features
//!
//! - **Bounded concurrency**: one flow per entity, gated by a shared semaphore
//! - **Isolation**: source failures degrade one entity's record, never the run
//! - **Precedence merge**: scalars from the most trusted source, lists unioned
//! - **Run report**: per-entity source attempts and unresolved fields
//!
//! # Example Usage
//!
//! ```no_run
//! use volt_enricher::{CancelFlag, EnricherConfig, Pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::from_config(EnricherConfig::default())?;
//! let mentions = vec!["Alphabet Inc.".to_string(), "Google LLC".to_string()];
//!
//! let output = pipeline.run(&mentions, &CancelFlag::new()).await?;
//! for warning in &output.report.warnings {
//!     println!("{}", warning);
//! }
//! println!("{}", serde_json::to_string_pretty(&output.companies)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cancel;
mod config;
mod enricher;
mod error;
mod input;
mod merger;
mod pipeline;
mod types;


pub use cancel::CancelFlag;
pub use config::{EnricherConfig, FallbackTrigger, MAX_CONCURRENT_ENTITIES};
pub use enricher::{Enricher, SourceSet};
pub use error::EnricherError;
pub use input::parse_mentions;
pub use merger::merge;
pub use pipeline::Pipeline;
pub use types::{EntityOutcome, EntityReport, RunOutput, RunReport, SourceAttempt, SourceStatus};
