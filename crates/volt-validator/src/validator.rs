//! Required-field enforcement and contract checking

use crate::{
    CompanyProfile, CompetitorEntry, ContractSchema, PersonEntry, ValidationConfig,
    ValidatorError,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};
use volt_domain::{EnrichedCompany, EntityId, FieldName};

/// A required field emitted with the unknown sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Entity the warning belongs to
    pub entity_id: EntityId,
    /// Canonical name of that entity
    pub entity: String,
    /// Field that could not be filled
    pub field: FieldName,
    /// Why, including best-effort source availability
    pub reason: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} unresolved ({})", self.entity, self.field, self.reason)
    }
}

/// Result of validating one company
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCompany {
    /// The output record
    pub profile: CompanyProfile,
    /// One warning per required field that fell back to the sentinel
    pub warnings: Vec<ValidationWarning>,
}

/// Validates merged companies against the output contract
///
/// Missing required fields are never dropped or invented: they are emitted
/// with the configured sentinel and reported as warnings. Present values are
/// passed through untouched.
pub struct SchemaValidator {
    config: ValidationConfig,
    schema: ContractSchema,
}

impl SchemaValidator {
    /// Create a validator using the bundled contract
    pub fn new(config: ValidationConfig) -> Result<Self, ValidatorError> {
        Ok(Self::with_schema(config, ContractSchema::bundled()?))
    }

    /// Create a validator with an explicit contract
    pub fn with_schema(config: ValidationConfig, schema: ContractSchema) -> Self {
        Self { config, schema }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Result<Self, ValidatorError> {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Build the output record for `company`
    ///
    /// `availability` summarizes what the sources reported for this entity
    /// (e.g. "wikidata: not found; wikipedia: timeout") and is carried into
    /// each warning.
    pub fn validate(&self, company: &EnrichedCompany, availability: &str) -> ValidatedCompany {
        let reason = if availability.trim().is_empty() {
            "no source supplied a value".to_string()
        } else {
            format!("no source supplied a value; {}", availability)
        };

        let warnings: Vec<ValidationWarning> = company
            .missing_required()
            .into_iter()
            .map(|field| ValidationWarning {
                entity_id: company.id,
                entity: company.name.clone(),
                field,
                reason: reason.clone(),
            })
            .collect();

        for warning in &warnings {
            warn!("Validation: {}", warning);
        }

        let text = |field: FieldName, value: &Option<String>| match value {
            Some(v) if company.has(field) => v.clone(),
            _ => self.config.unknown_sentinel.clone(),
        };

        let profile = CompanyProfile {
            name: company.name.clone(),
            aliases: company.aliases.clone(),
            website: text(FieldName::Website, &company.website),
            sector: text(FieldName::Sector, &company.sector),
            hq_location: text(FieldName::HqLocation, &company.hq_location),
            description: text(FieldName::Description, &company.description),
            key_people: company.key_people.iter().map(PersonEntry::from).collect(),
            competitors: company.competitors.iter().map(CompetitorEntry::from).collect(),
            sources: company
                .sources
                .iter()
                .filter(|(field, _)| company.has(**field))
                .map(|(field, source)| (field.as_str().to_string(), source.to_string()))
                .collect(),
        };

        ValidatedCompany { profile, warnings }
    }

    /// Check a serialized output array against the contract
    pub fn check_output(&self, output: &Value) -> Result<(), ValidatorError> {
        if !self.config.check_contract {
            return Ok(());
        }
        let violations = self.schema.check(output);
        if violations.is_empty() {
            debug!("Output conforms to the contract");
            Ok(())
        } else {
            Err(ValidatorError::Contract(violations))
        }
    }

    /// Serialize `profiles` and check them against the contract
    pub fn check_profiles(&self, profiles: &[CompanyProfile]) -> Result<(), ValidatorError> {
        let value = serde_json::to_value(profiles)
            .map_err(|e| ValidatorError::Serialization(e.to_string()))?;
        self.check_output(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use volt_domain::{CanonicalEntity, Person, SourceId};

    fn bare(name: &str) -> EnrichedCompany {
        EnrichedCompany::from_entity(&CanonicalEntity::new(name))
    }

    #[test]
    fn test_all_missing_yields_sentinels_and_six_warnings() {
        let validator = SchemaValidator::default_config().unwrap();
        let company = bare("Acme");

        let result = validator.validate(&company, "wikidata: not found; wikipedia: timeout");
        assert_eq!(result.profile.website, "");
        assert_eq!(result.profile.sector, "");
        assert!(result.profile.key_people.is_empty());
        assert_eq!(result.warnings.len(), 6);
        assert!(result.warnings.iter().all(|w| w.entity_id == company.id));
        assert!(result.warnings[0].reason.contains("wikipedia: timeout"));
        assert_eq!(result.warnings[0].field, FieldName::Website);
    }

    #[test]
    fn test_present_values_are_untouched() {
        let validator = SchemaValidator::new(ValidationConfig::with_sentinel("Unknown")).unwrap();
        let mut company = bare("Acme");
        company.website = Some("https://acme.example/ ".to_string());
        company.sector = Some("   ".to_string());
        company.key_people.push(Person::with_role("Wile E. Coyote", "Founder"));
        company.sources.insert(FieldName::Website, SourceId::from("wikidata"));
        company.sources.insert(FieldName::Sector, SourceId::from("wikipedia"));

        let result = validator.validate(&company, "");
        assert_eq!(result.profile.website, "https://acme.example/ ");
        assert_eq!(result.profile.sector, "Unknown");
        assert_eq!(result.profile.key_people[0].role.as_deref(), Some("Founder"));
        assert_eq!(result.profile.sources.len(), 1);
        assert_eq!(result.profile.sources["website"], "wikidata");
        assert_eq!(result.warnings.len(), 4);
        assert_eq!(result.warnings[0].reason, "no source supplied a value");
    }

    #[test]
    fn test_profiles_pass_the_contract() {
        let validator = SchemaValidator::default_config().unwrap();
        let profiles: Vec<CompanyProfile> = ["Acme", "Globex"]
            .iter()
            .map(|n| validator.validate(&bare(n), "").profile)
            .collect();
        assert!(validator.check_profiles(&profiles).is_ok());
    }

    #[test]
    fn test_contract_violation_is_an_error() {
        let validator = SchemaValidator::default_config().unwrap();
        let err = validator
            .check_output(&json!([{ "name": "Acme" }]))
            .unwrap_err();
        match err {
            ValidatorError::Contract(violations) => assert_eq!(violations.len(), 6),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_contract_check_can_be_disabled() {
        let validator = SchemaValidator::new(ValidationConfig {
            check_contract: false,
            ..ValidationConfig::default()
        })
        .unwrap();
        assert!(validator.check_output(&json!({})).is_ok());
    }

    #[test]
    fn test_warning_display() {
        let validator = SchemaValidator::default_config().unwrap();
        let result = validator.validate(&bare("Acme"), "");
        assert_eq!(
            result.warnings[0].to_string(),
            "Acme: website unresolved (no source supplied a value)"
        );
    }
}
