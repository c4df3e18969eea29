//! Resolver error types

use thiserror::Error;

/// Errors that abort resolution
///
/// Both variants are structural: a bad configuration or malformed extractor
/// output. Mentions that merely normalize to nothing are dropped, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mention exceeds the configured maximum length
    #[error("Mention {index} too long: {length} chars (max: {max})")]
    MentionTooLong {
        /// Position in the input sequence
        index: usize,
        /// Length in characters
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Mention contains control characters
    #[error("Mention {index} contains control characters")]
    ControlCharacters {
        /// Position in the input sequence
        index: usize,
    },
}
