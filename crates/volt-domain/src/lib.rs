//! Volt Domain Layer
//!
//! Core data model shared by every Volt crate. Like the rest of the domain
//! layer it carries no I/O and only one external dependency (`uuid`).
//!
//! ## Key Concepts
//!
//! - **Mention**: a raw company-name string as extracted from text
//! - **CanonicalEntity**: one logical company built from one or more mentions
//! - **PartialRecord**: a single source's contribution toward an entity
//! - **Confidence**: static per-source precedence used to arbitrate conflicts
//! - **EnrichedCompany**: the merged entity, prior to schema validation
//!
//! ## Lifecycle
//!
//! ```text
//! Mention → CanonicalEntity → PartialRecord* → EnrichedCompany → (validator)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod company;
pub mod confidence;
pub mod entity;
pub mod field;
pub mod record;

// Re-exports for convenience
pub use company::EnrichedCompany;
pub use confidence::{Confidence, SourceId};
pub use entity::{same_name, CanonicalEntity, EntityId, Mention};
pub use field::FieldName;
pub use record::{CompetitorNote, PartialRecord, Person, RecordFields};

/// Current Unix time in seconds
///
/// Falls back to 0 if the system clock is set before the epoch.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
