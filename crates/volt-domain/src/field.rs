//! Output field vocabulary shared by sources, merger and validator

use serde::{Serialize, Serializer};
use std::fmt;

/// A field of the enriched company record
///
/// `as_str` yields the key used in the JSON output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    /// Company name (fixed at dedup time)
    Name,
    /// Official website URL
    Website,
    /// Industry or sector
    Sector,
    /// Headquarters location
    HqLocation,
    /// Short textual description
    Description,
    /// Key people (founders, executives)
    KeyPeople,
    /// Competitors
    Competitors,
}

impl FieldName {
    /// Fields every emitted object must carry (besides `name`)
    pub const REQUIRED: [FieldName; 6] = [
        FieldName::Website,
        FieldName::Sector,
        FieldName::HqLocation,
        FieldName::Description,
        FieldName::KeyPeople,
        FieldName::Competitors,
    ];

    /// JSON key for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Website => "website",
            FieldName::Sector => "sector",
            FieldName::HqLocation => "hq_location",
            FieldName::Description => "description",
            FieldName::KeyPeople => "key_people",
            FieldName::Competitors => "competitors",
        }
    }

    /// Parse a field from its JSON key (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(FieldName::Name),
            "website" => Some(FieldName::Website),
            "sector" => Some(FieldName::Sector),
            "hq_location" => Some(FieldName::HqLocation),
            "description" => Some(FieldName::Description),
            "key_people" => Some(FieldName::KeyPeople),
            "competitors" => Some(FieldName::Competitors),
            _ => None,
        }
    }

    /// Whether the field holds a list rather than a scalar string
    pub fn is_list(&self) -> bool {
        matches!(self, FieldName::KeyPeople | FieldName::Competitors)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::str::FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keys_round_trip() {
        for field in FieldName::REQUIRED {
            assert_eq!(FieldName::parse(field.as_str()), Some(field));
        }
        assert_eq!("HQ_LOCATION".parse::<FieldName>(), Ok(FieldName::HqLocation));
        assert!("headquarters".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_serializes_as_json_key() {
        let value = serde_json::to_value([FieldName::HqLocation, FieldName::KeyPeople]).unwrap();
        assert_eq!(value, serde_json::json!(["hq_location", "key_people"]));
    }

    #[test]
    fn test_name_is_not_required_field_list() {
        assert!(!FieldName::REQUIRED.contains(&FieldName::Name));
        assert!(FieldName::KeyPeople.is_list());
        assert!(!FieldName::Sector.is_list());
    }
}
