//! Volt Validator
//!
//! Enforces the output contract before anything is emitted.
//!
//! The validator provides:
//! - Required-field enforcement with a configurable unknown sentinel
//! - One [`ValidationWarning`] per entity per unresolved field
//! - A checker for the bundled JSON contract (`schema.json`)
//!
//! # Examples
//!
//! ```
//! use volt_domain::{CanonicalEntity, EnrichedCompany};
//! use volt_validator::SchemaValidator;
//!
//! let validator = SchemaValidator::default_config().unwrap();
//! let company = EnrichedCompany::from_entity(&CanonicalEntity::new("Acme"));
//!
//! let result = validator.validate(&company, "wikidata: not found");
//! assert_eq!(result.profile.website, "");
//! assert_eq!(result.warnings.len(), 6);
//! assert!(validator.check_profiles(&[result.profile]).is_ok());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod profile;
mod schema;
mod validator;

pub use config::ValidationConfig;
pub use error::ValidatorError;
pub use profile::{CompanyProfile, CompetitorEntry, PersonEntry};
pub use schema::{ContractSchema, Violation, BUNDLED_SCHEMA};
pub use validator::{SchemaValidator, ValidatedCompany, ValidationWarning};
