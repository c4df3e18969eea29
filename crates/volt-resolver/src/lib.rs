//! Volt Resolver
//!
//! Turns the raw mention list produced by the external mention extractor into
//! canonical entities.
//!
//! The resolver provides:
//! - Name normalization (casing, punctuation, trailing legal suffixes)
//! - Greedy left-to-right fuzzy clustering of mentions
//! - Representative selection (longest original-cased mention, first seen on ties)
//!
//! # Examples
//!
//! ```
//! use volt_resolver::{Deduplicator, ResolverConfig};
//!
//! let dedup = Deduplicator::new(ResolverConfig::default()).unwrap();
//! let mentions = vec![
//!     "Acme Inc.".to_string(),
//!     "ACME".to_string(),
//!     "Acme Corporation".to_string(),
//! ];
//!
//! let resolution = dedup.resolve(&mentions).unwrap();
//! assert_eq!(resolution.entities.len(), 1);
//! assert_eq!(resolution.entities[0].canonical_name, "Acme Corporation");
//! ```

#![warn(missing_docs)]

mod config;
mod dedup;
mod error;
mod normalizer;

pub use config::ResolverConfig;
pub use dedup::{similarity, Deduplicator, Resolution};
pub use error::ResolverError;
pub use normalizer::{is_legal_suffix, normalize, token_sorted, LEGAL_SUFFIXES};
