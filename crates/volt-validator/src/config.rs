//! Validator configuration

use serde::{Deserialize, Serialize};

/// How unresolved required fields are emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Value written for a required string field no source supplied
    ///
    /// Lists always use the empty sequence.
    pub unknown_sentinel: String,

    /// Check the serialized output against the contract schema
    pub check_contract: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_sentinel: String::new(),
            check_contract: true,
        }
    }
}

impl ValidationConfig {
    /// Use `sentinel` for unresolved string fields
    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            unknown_sentinel: sentinel.into(),
            ..Self::default()
        }
    }
}
