//! The merged, not yet validated, company record

use crate::{CanonicalEntity, CompetitorNote, EntityId, FieldName, Person, SourceId};
use std::collections::BTreeMap;

/// A canonical entity enriched with merged field values
///
/// Optional scalars stay `None` when no source supplied them; the validator
/// decides how unresolved required fields are emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCompany {
    /// Entity this record was built from
    pub id: EntityId,
    /// Canonical name, fixed at dedup time
    pub name: String,
    /// Mention aliases plus source-reported alternate names
    pub aliases: Vec<String>,
    /// Official website
    pub website: Option<String>,
    /// Industry or sector
    pub sector: Option<String>,
    /// Headquarters location
    pub hq_location: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Key people
    pub key_people: Vec<Person>,
    /// Competitors
    pub competitors: Vec<CompetitorNote>,
    /// Which source supplied each field
    pub sources: BTreeMap<FieldName, SourceId>,
}

impl EnrichedCompany {
    /// A record carrying only the entity's name and aliases
    pub fn from_entity(entity: &CanonicalEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.canonical_name.clone(),
            aliases: entity.aliases.clone(),
            website: None,
            sector: None,
            hq_location: None,
            description: None,
            key_people: Vec::new(),
            competitors: Vec::new(),
            sources: BTreeMap::new(),
        }
    }

    /// Whether `field` holds a usable value
    pub fn has(&self, field: FieldName) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        match field {
            FieldName::Name => !self.name.trim().is_empty(),
            FieldName::Website => filled(&self.website),
            FieldName::Sector => filled(&self.sector),
            FieldName::HqLocation => filled(&self.hq_location),
            FieldName::Description => filled(&self.description),
            FieldName::KeyPeople => !self.key_people.is_empty(),
            FieldName::Competitors => !self.competitors.is_empty(),
        }
    }

    /// Required fields with no usable value, in contract order
    pub fn missing_required(&self) -> Vec<FieldName> {
        FieldName::REQUIRED
            .into_iter()
            .filter(|f| !self.has(*f))
            .collect()
    }
}
