//! Error types for the enricher
//!
//! Only structural problems are errors here. Per-source failures never leave
//! an entity flow; they are recorded as [`SourceStatus`](crate::SourceStatus).

use thiserror::Error;
use volt_resolver::ResolverError;
use volt_validator::ValidatorError;

/// Errors that abort a whole run (nothing is emitted)
#[derive(Error, Debug)]
pub enum EnricherError {
    /// Invalid or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extractor output that cannot be processed
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Mention resolution rejected the input
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// The run was cancelled before completion
    #[error("Run cancelled")]
    Cancelled,

    /// The assembled output violates the contract
    #[error("Validation error: {0}")]
    Validation(#[from] ValidatorError),
}
