//! Validator error types

use crate::Violation;
use thiserror::Error;

/// Errors that can occur during output validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// The contract schema itself could not be read
    #[error("Schema error: {0}")]
    Schema(String),

    /// Output could not be serialized for checking
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Output does not conform to the contract
    #[error("Output violates the contract ({} violation(s)): {}", .0.len(), summarize(.0))]
    Contract(Vec<Violation>),
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .take(3)
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
