//! Per-source enrichment results

use crate::{unix_now, Confidence, FieldName, SourceId};

/// A key person at a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Full name
    pub name: String,
    /// Role or title, if known
    pub role: Option<String>,
}

impl Person {
    /// Person without a known role
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: None }
    }

    /// Person with a role
    pub fn with_role(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self { name: name.into(), role: Some(role.into()) }
    }
}

/// A competitor with an optional note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitorNote {
    /// Competitor name
    pub name: String,
    /// Free-form note
    pub note: Option<String>,
}

impl CompetitorNote {
    /// Competitor without a note
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), note: None }
    }

    /// Competitor with a note
    pub fn with_note(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self { name: name.into(), note: Some(note.into()) }
    }
}

/// Field values reported by one source, in the common vocabulary
///
/// Absent scalars are `None`; absent lists are empty. Blank strings are
/// treated as absent by [`RecordFields::provides`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    /// Official website
    pub website: Option<String>,
    /// Industry or sector
    pub sector: Option<String>,
    /// Headquarters location
    pub hq_location: Option<String>,
    /// Textual description
    pub description: Option<String>,
    /// Key people, in source order
    pub key_people: Vec<Person>,
    /// Competitors, in source order
    pub competitors: Vec<CompetitorNote>,
    /// Other names the source knows this company by
    pub alternate_names: Vec<String>,
}

impl RecordFields {
    /// Scalar value of a field, if this is a scalar field with a non-blank value
    pub fn scalar(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::Website => self.website.as_deref(),
            FieldName::Sector => self.sector.as_deref(),
            FieldName::HqLocation => self.hq_location.as_deref(),
            FieldName::Description => self.description.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether this record carries a usable value for `field`
    pub fn provides(&self, field: FieldName) -> bool {
        match field {
            FieldName::Name => false,
            FieldName::KeyPeople => self.key_people.iter().any(|p| !p.name.trim().is_empty()),
            FieldName::Competitors => self.competitors.iter().any(|c| !c.name.trim().is_empty()),
            scalar => self.scalar(scalar).is_some(),
        }
    }

    /// Required fields this record provides
    pub fn provided(&self) -> Vec<FieldName> {
        FieldName::REQUIRED
            .into_iter()
            .filter(|f| self.provides(*f))
            .collect()
    }

    /// Whether the record carries nothing at all
    pub fn is_empty(&self) -> bool {
        self.provided().is_empty() && self.alternate_names.is_empty()
    }
}

/// One source's contribution toward an entity
///
/// Immutable once produced; owned by the orchestrator until merge.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRecord {
    /// Which source produced this record
    pub source: SourceId,
    /// Static precedence of that source
    pub confidence: Confidence,
    /// Reported field values
    pub fields: RecordFields,
    /// When the record was fetched (Unix seconds)
    pub fetched_at: u64,
}

impl PartialRecord {
    /// Create a record stamped with the current time
    pub fn new(source: SourceId, confidence: Confidence, fields: RecordFields) -> Self {
        Self {
            source,
            confidence,
            fields,
            fetched_at: unix_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_not_provided() {
        let fields = RecordFields {
            website: Some("  ".to_string()),
            sector: Some("Technology".to_string()),
            key_people: vec![Person::new("")],
            ..Default::default()
        };

        assert!(!fields.provides(FieldName::Website));
        assert!(fields.provides(FieldName::Sector));
        assert!(!fields.provides(FieldName::KeyPeople));
        assert_eq!(fields.provided(), vec![FieldName::Sector]);
    }

    #[test]
    fn test_scalar_is_trimmed() {
        let fields = RecordFields {
            hq_location: Some(" Mountain View ".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.scalar(FieldName::HqLocation), Some("Mountain View"));
        assert_eq!(fields.scalar(FieldName::KeyPeople), None);
    }

    #[test]
    fn test_empty_record() {
        assert!(RecordFields::default().is_empty());
        let named = RecordFields {
            alternate_names: vec!["Alphabet".to_string()],
            ..Default::default()
        };
        assert!(!named.is_empty());
    }

    #[test]
    fn test_partial_record_is_timestamped() {
        let record = PartialRecord::new(
            SourceId::from("wikidata"),
            Confidence::High,
            RecordFields::default(),
        );
        assert!(record.fetched_at > 1_577_836_800); // after 2020-01-01
    }
}
