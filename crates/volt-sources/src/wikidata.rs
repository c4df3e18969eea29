//! Structured knowledge graph client (Wikidata)
//!
//! Lookup is three calls: `wbsearchentities` to find the item, the item's
//! `Special:EntityData` document for its claims, then one batched
//! `wbgetentities` to label the linked items (industry, headquarters, people).

use crate::{
    HttpFetcher, LookupError, LookupRequest, SourceClient, SourceSettings, WIKIDATA_SOURCE,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};
use volt_domain::{same_name, Confidence, PartialRecord, Person, RecordFields, SourceId};

/// Action API endpoint
pub const WIKIDATA_API_URL: &str = "https://www.wikidata.org/w/api.php";

/// Entity document endpoint
pub const WIKIDATA_ENTITY_URL: &str = "https://www.wikidata.org/wiki/Special:EntityData";

/// Official website
const P_WEBSITE: &str = "P856";
/// Industry
const P_INDUSTRY: &str = "P452";
/// Headquarters location
const P_HEADQUARTERS: &str = "P159";

/// People properties, in priority order, with the role they imply
const PEOPLE_PROPERTIES: [(&str, &str); 3] = [
    ("P169", "Chief Executive Officer"),
    ("P112", "Founder"),
    ("P1037", "Director / Manager"),
];

/// Key people kept per company
pub const MAX_KEY_PEOPLE: usize = 3;

/// English aliases kept as alternate names
pub const MAX_ALIASES: usize = 5;

/// A search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Item id, e.g. "Q95"
    pub id: String,
    /// English label
    pub label: String,
}

/// Facts read from an entity document before linked items are labelled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFacts {
    /// English label
    pub label: Option<String>,
    /// English aliases, capped at [`MAX_ALIASES`]
    pub aliases: Vec<String>,
    /// Official website
    pub website: Option<String>,
    /// Industry item id
    pub industry: Option<String>,
    /// Headquarters item id
    pub headquarters: Option<String>,
    /// Person item ids with roles, in priority order
    pub people: Vec<(String, &'static str)>,
}

impl EntityFacts {
    /// Item ids that need labels
    pub fn linked_items(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .industry
            .iter()
            .chain(self.headquarters.iter())
            .cloned()
            .chain(self.people.iter().map(|(id, _)| id.clone()))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Build record fields, resolving item ids through `labels`
    ///
    /// Items without a label are left out rather than reported as raw ids.
    pub fn into_fields(self, labels: &HashMap<String, String>) -> RecordFields {
        let label_of = |id: &Option<String>| id.as_ref().and_then(|id| labels.get(id)).cloned();

        let mut key_people: Vec<Person> = Vec::new();
        for (id, role) in &self.people {
            let Some(name) = labels.get(id) else { continue };
            if key_people.iter().any(|p| same_name(&p.name, name)) {
                continue;
            }
            key_people.push(Person::with_role(name.clone(), *role));
            if key_people.len() >= MAX_KEY_PEOPLE {
                break;
            }
        }

        let mut alternate_names: Vec<String> = self.label.iter().cloned().collect();
        alternate_names.extend(self.aliases.iter().cloned());

        RecordFields {
            website: self.website.clone(),
            sector: label_of(&self.industry),
            hq_location: label_of(&self.headquarters),
            description: None,
            key_people,
            competitors: Vec::new(),
            alternate_names,
        }
    }
}

/// First hit of a `wbsearchentities` response
pub fn parse_search_hit(response: &Value) -> Option<SearchHit> {
    let hit = response.get("search")?.as_array()?.first()?;
    let id = hit.get("id")?.as_str()?.to_string();
    let label = hit
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or(&id)
        .to_string();
    Some(SearchHit { id, label })
}

/// Extract facts from a `Special:EntityData` document
///
/// Wikidata may answer with a redirect target, so the first entity is used
/// when `id` itself is not a key.
pub fn parse_entity(document: &Value, id: &str) -> Option<EntityFacts> {
    let entities = document.get("entities")?.as_object()?;
    let entity = entities.get(id).or_else(|| entities.values().next())?;

    let label = entity
        .pointer("/labels/en/value")
        .and_then(Value::as_str)
        .map(str::to_string);
    let aliases = entity
        .pointer("/aliases/en")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|a| a.get("value").and_then(Value::as_str))
                .take(MAX_ALIASES)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut people = Vec::new();
    for (property, role) in PEOPLE_PROPERTIES {
        for item in item_claims(entity, property) {
            if !people.iter().any(|(id, _)| *id == item) {
                people.push((item, role));
            }
        }
    }

    Some(EntityFacts {
        label,
        aliases,
        website: string_claims(entity, P_WEBSITE).into_iter().next(),
        industry: item_claims(entity, P_INDUSTRY).into_iter().next(),
        headquarters: item_claims(entity, P_HEADQUARTERS).into_iter().next(),
        people,
    })
}

/// English labels from a `wbgetentities` response
pub fn parse_labels(response: &Value) -> HashMap<String, String> {
    let Some(entities) = response.get("entities").and_then(Value::as_object) else {
        return HashMap::new();
    };
    entities
        .iter()
        .filter_map(|(id, entity)| {
            let label = entity.pointer("/labels/en/value")?.as_str()?;
            Some((id.clone(), label.to_string()))
        })
        .collect()
}

/// Claim values for a property, skipping deprecated statements
fn claim_values<'a>(entity: &'a Value, property: &str) -> Vec<&'a Value> {
    let Some(claims) = entity.pointer(&format!("/claims/{}", property)).and_then(Value::as_array)
    else {
        return Vec::new();
    };
    claims
        .iter()
        .filter(|c| c.get("rank").and_then(Value::as_str) != Some("deprecated"))
        .filter_map(|c| c.pointer("/mainsnak/datavalue/value"))
        .collect()
}

fn string_claims(entity: &Value, property: &str) -> Vec<String> {
    claim_values(entity, property)
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn item_claims(entity: &Value, property: &str) -> Vec<String> {
    claim_values(entity, property)
        .into_iter()
        .filter_map(|value| {
            if let Some(id) = value.get("id").and_then(Value::as_str) {
                return Some(id.to_string());
            }
            value
                .get("numeric-id")
                .and_then(Value::as_u64)
                .map(|n| format!("Q{}", n))
        })
        .collect()
}

/// Structured knowledge graph client
pub struct WikidataClient {
    http: HttpFetcher,
    api_url: String,
    entity_url: String,
}

impl WikidataClient {
    /// Create a client against the public endpoints
    pub fn new(settings: &SourceSettings, user_agent: &str) -> Result<Self, LookupError> {
        Ok(Self {
            http: HttpFetcher::new(WIKIDATA_SOURCE, settings, user_agent)?,
            api_url: WIKIDATA_API_URL.to_string(),
            entity_url: WIKIDATA_ENTITY_URL.to_string(),
        })
    }

    /// Point the client at other endpoints
    pub fn with_endpoints(mut self, api_url: impl Into<String>, entity_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.entity_url = entity_url.into();
        self
    }

    async fn search(&self, name: &str) -> Result<Option<SearchHit>, LookupError> {
        let response = self
            .http
            .get_json(
                &self.api_url,
                &[
                    ("action", "wbsearchentities"),
                    ("search", name),
                    ("language", "en"),
                    ("type", "item"),
                    ("limit", "1"),
                    ("format", "json"),
                ],
            )
            .await?;
        Ok(parse_search_hit(&response))
    }

    async fn labels(&self, ids: &[String]) -> Result<HashMap<String, String>, LookupError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join("|");
        let response = self
            .http
            .get_json(
                &self.api_url,
                &[
                    ("action", "wbgetentities"),
                    ("ids", &joined),
                    ("props", "labels"),
                    ("languages", "en"),
                    ("format", "json"),
                ],
            )
            .await?;
        Ok(parse_labels(&response))
    }
}

#[async_trait]
impl SourceClient for WikidataClient {
    fn id(&self) -> SourceId {
        SourceId::from(WIKIDATA_SOURCE)
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<PartialRecord, LookupError> {
        let mut found = None;
        for name in request.names() {
            if let Some(hit) = self.search(name).await? {
                debug!("wikidata: '{}' matched {} ({})", name, hit.label, hit.id);
                found = Some(hit);
                break;
            }
        }
        let hit = found.ok_or(LookupError::NotFound)?;

        let url = format!("{}/{}.json", self.entity_url, hit.id);
        let document = self.http.get_json(&url, &[]).await?;
        let facts = parse_entity(&document, &hit.id)
            .ok_or_else(|| LookupError::Fatal(format!("entity document for {} has no entities", hit.id)))?;

        let labels = match self.labels(&facts.linked_items()).await {
            Ok(labels) => labels,
            Err(e) => {
                warn!("wikidata: could not label linked items of {}: {}", hit.id, e);
                HashMap::new()
            }
        };

        Ok(PartialRecord::new(
            self.id(),
            self.confidence(),
            facts.into_fields(&labels),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str) -> Value {
        json!({ "mainsnak": { "datavalue": { "value": { "entity-type": "item", "id": id } } }, "rank": "normal" })
    }

    fn google_document() -> Value {
        json!({
            "entities": {
                "Q95": {
                    "labels": { "en": { "value": "Google" } },
                    "aliases": { "en": [ { "value": "Google LLC" }, { "value": "Google Inc." } ] },
                    "claims": {
                        "P856": [
                            { "mainsnak": { "datavalue": { "value": "https://www.google.com/" } }, "rank": "preferred" }
                        ],
                        "P452": [ item("Q11661") ],
                        "P159": [ item("Q486860") ],
                        "P169": [ item("Q3503829") ],
                        "P112": [
                            item("Q4934"),
                            item("Q4914"),
                            { "mainsnak": { "datavalue": { "value": { "numeric-id": 3503829 } } } }
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_search_hit() {
        let response = json!({ "search": [ { "id": "Q95", "label": "Google" }, { "id": "Q1", "label": "x" } ] });
        assert_eq!(
            parse_search_hit(&response),
            Some(SearchHit { id: "Q95".into(), label: "Google".into() })
        );
        assert_eq!(parse_search_hit(&json!({ "search": [] })), None);
        assert_eq!(parse_search_hit(&json!({ "error": "bad" })), None);
    }

    #[test]
    fn test_parse_entity_reads_claims() {
        let facts = parse_entity(&google_document(), "Q95").unwrap();
        assert_eq!(facts.label.as_deref(), Some("Google"));
        assert_eq!(facts.aliases, vec!["Google LLC", "Google Inc."]);
        assert_eq!(facts.website.as_deref(), Some("https://www.google.com/"));
        assert_eq!(facts.industry.as_deref(), Some("Q11661"));
        assert_eq!(facts.headquarters.as_deref(), Some("Q486860"));
        // CEO first; the founder claim repeating the CEO is not duplicated
        assert_eq!(
            facts.people,
            vec![
                ("Q3503829".to_string(), "Chief Executive Officer"),
                ("Q4934".to_string(), "Founder"),
                ("Q4914".to_string(), "Founder"),
            ]
        );
    }

    #[test]
    fn test_parse_entity_follows_redirect() {
        let facts = parse_entity(&google_document(), "Q12345").unwrap();
        assert_eq!(facts.label.as_deref(), Some("Google"));
        assert!(parse_entity(&json!({ "entities": {} }), "Q1").is_none());
    }

    #[test]
    fn test_deprecated_claims_are_skipped() {
        let document = json!({
            "entities": { "Q1": { "claims": { "P856": [
                { "mainsnak": { "datavalue": { "value": "http://old.example" } }, "rank": "deprecated" },
                { "mainsnak": { "datavalue": { "value": "https://new.example" } }, "rank": "normal" }
            ] } } }
        });
        let facts = parse_entity(&document, "Q1").unwrap();
        assert_eq!(facts.website.as_deref(), Some("https://new.example"));
    }

    #[test]
    fn test_into_fields_resolves_labels() {
        let facts = parse_entity(&google_document(), "Q95").unwrap();
        assert_eq!(facts.linked_items().len(), 5);

        let labels = parse_labels(&json!({
            "entities": {
                "Q11661": { "labels": { "en": { "value": "information technology" } } },
                "Q486860": { "labels": { "en": { "value": "Mountain View" } } },
                "Q3503829": { "labels": { "en": { "value": "Sundar Pichai" } } },
                "Q4934": { "labels": { "en": { "value": "Larry Page" } } },
                "Q4914": { "labels": {} }
            }
        }));

        let fields = facts.into_fields(&labels);
        assert_eq!(fields.sector.as_deref(), Some("information technology"));
        assert_eq!(fields.hq_location.as_deref(), Some("Mountain View"));
        assert_eq!(
            fields.key_people,
            vec![
                Person::with_role("Sundar Pichai", "Chief Executive Officer"),
                Person::with_role("Larry Page", "Founder"),
            ]
        );
        assert_eq!(fields.alternate_names, vec!["Google", "Google LLC", "Google Inc."]);
        assert!(fields.description.is_none());
    }

    #[test]
    fn test_key_people_are_capped() {
        let facts = EntityFacts {
            people: (1..=5).map(|n| (format!("Q{}", n), "Founder")).collect(),
            ..Default::default()
        };
        let labels: HashMap<String, String> =
            (1..=5).map(|n| (format!("Q{}", n), format!("Person {}", n))).collect();
        assert_eq!(facts.into_fields(&labels).key_people.len(), MAX_KEY_PEOPLE);
    }

    #[test]
    fn test_unlabelled_items_are_absent() {
        let facts = parse_entity(&google_document(), "Q95").unwrap();
        let fields = facts.into_fields(&HashMap::new());
        assert!(fields.sector.is_none());
        assert!(fields.key_people.is_empty());
        assert_eq!(fields.website.as_deref(), Some("https://www.google.com/"));
    }
}
