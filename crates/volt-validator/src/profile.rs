//! Output records in the shape of the JSON contract

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volt_domain::{CompetitorNote, Person};

/// A key person as emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
    /// Full name
    pub name: String,
    /// Role, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<&Person> for PersonEntry {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            role: person.role.clone(),
        }
    }
}

/// A competitor as emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    /// Competitor name
    pub name: String,
    /// Note, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&CompetitorNote> for CompetitorEntry {
    fn from(note: &CompetitorNote) -> Self {
        Self {
            name: note.name.clone(),
            note: note.note.clone(),
        }
    }
}

/// One validated company, every required key concrete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Canonical name
    pub name: String,
    /// Other names
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Website, or the unknown sentinel
    pub website: String,
    /// Sector, or the unknown sentinel
    pub sector: String,
    /// Headquarters, or the unknown sentinel
    pub hq_location: String,
    /// Description, or the unknown sentinel
    pub description: String,
    /// Key people, possibly empty
    pub key_people: Vec<PersonEntry>,
    /// Competitors, possibly empty
    pub competitors: Vec<CompetitorEntry>,
    /// Field name to supplying source id
    #[serde(default)]
    pub sources: BTreeMap<String, String>,
}
