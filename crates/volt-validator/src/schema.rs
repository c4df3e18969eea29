//! Output contract schema
//!
//! Wraps a compiled JSON Schema validator built from the contract document.
//! Violations carry the JSON Pointer of the offending instance.

use crate::ValidatorError;
use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// The contract bundled with the crate
pub const BUNDLED_SCHEMA: &str = include_str!("../schema.json");

/// A contract violation at a JSON Pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location, e.g. `/2/key_people/0/name` (empty for the root)
    pub path: String,
    /// What is wrong
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// A compiled contract schema
pub struct ContractSchema {
    validator: Validator,
}

impl fmt::Debug for ContractSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractSchema").finish_non_exhaustive()
    }
}

impl ContractSchema {
    /// The bundled output contract
    pub fn bundled() -> Result<Self, ValidatorError> {
        Self::from_json(BUNDLED_SCHEMA)
    }

    /// Parse and compile a schema document
    pub fn from_json(text: &str) -> Result<Self, ValidatorError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| ValidatorError::Schema(format!("invalid schema JSON: {}", e)))?;
        if !root.is_object() {
            return Err(ValidatorError::Schema("schema must be a JSON object".to_string()));
        }
        let validator = jsonschema::validator_for(&root)
            .map_err(|e| ValidatorError::Schema(format!("invalid schema: {}", e)))?;
        Ok(Self { validator })
    }

    /// Load a schema from disk
    pub fn from_path(path: &Path) -> Result<Self, ValidatorError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ValidatorError::Schema(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Every violation in `instance`
    pub fn check(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}
