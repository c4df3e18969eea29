//! Natural-language fallback: Anthropic Messages API with the web search tool
//!
//! The model is asked for one JSON object in the common field vocabulary. Its
//! reply is free text, so parsing is lenient: the outermost `{…}` is parsed
//! as-is, then after a regex repair of unquoted values and trailing commas,
//! and as a last resort the first URL in the text is taken as the website.

use crate::{
    FallbackSettings, HttpFetcher, LookupError, LookupRequest, SourceClient, WEB_SEARCH_SOURCE,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};
use volt_domain::{same_name, CompetitorNote, Confidence, FieldName, PartialRecord, Person, RecordFields, SourceId};

/// Messages endpoint
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Server-side web search tool type
pub const WEB_SEARCH_TOOL: &str = "web_search_20250305";

const MAX_TOKENS: u32 = 1024;

/// Key people kept from a search answer
const MAX_KEY_PEOPLE: usize = 3;

/// Values that mean "not found" in a model answer
const ABSENT_MARKERS: [&str; 6] = ["", "unknown", "null", "none", "n/a", "not available"];

fn unquoted_value() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"("[^"]*"\s*:\s*)([^"{\[\d\s\-][^,\n}]*)"#).ok())
        .as_ref()
}

fn trailing_comma() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").ok()).as_ref()
}

fn first_url() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s"'\\<>()\[\]]+"#).ok())
        .as_ref()
}

/// Prompt for one company, focused on the fields still missing
pub fn build_prompt(request: &LookupRequest) -> String {
    let mut prompt = String::from(
        "You are a JSON-only extractor. Your entire reply will be parsed as JSON \
         and any other text causes failure.\n\n",
    );
    prompt.push_str(&format!(
        "Find the official website and a short profile for the company '{}'",
        request.name
    ));
    if !request.aliases.is_empty() {
        prompt.push_str(&format!(" (also known as: {})", request.aliases.join(", ")));
    }
    prompt.push_str(".\n");
    if !request.missing.is_empty() {
        let missing: Vec<&str> = request.missing.iter().map(FieldName::as_str).collect();
        prompt.push_str(&format!(
            "Focus on these fields, which are still unknown: {}.\n",
            missing.join(", ")
        ));
    }
    prompt.push_str(
        "Respond with one JSON object that has exactly these keys:\n\
         - website\n\
         - description\n\
         - sector\n\
         - hq_location\n\
         - key_people (list of {\"name\", \"role\"})\n\
         - competitors (list of {\"name\", \"note\"})\n\n\
         Do not wrap the JSON in markdown and do not add commentary. \
         If you cannot find a value, use null. Never guess.",
    );
    prompt
}

/// Concatenated text blocks of a Messages API response
pub fn response_text(response: &Value) -> String {
    response
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Parse a model answer into record fields
///
/// Returns `None` when nothing usable can be recovered.
pub fn parse_profile(text: &str) -> Option<RecordFields> {
    if let Some(object) = extract_object(text) {
        let fields = fields_from_object(&object);
        if !fields.is_empty() {
            return Some(fields);
        }
    }

    let url = first_url()?.find(text)?;
    debug!("web search: no usable JSON in answer, using first URL");
    Some(RecordFields {
        website: Some(url.as_str().trim_end_matches(['.', ',']).to_string()),
        ..Default::default()
    })
}

/// Outermost JSON object in `text`, repairing it if needed
fn extract_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let blob = &text[start..=end];

    if let Ok(Value::Object(object)) = serde_json::from_str(blob) {
        return Some(object);
    }

    let repaired = unquoted_value()?.replace_all(blob, |caps: &regex::Captures| {
        format!("{}\"{}\"", &caps[1], caps[2].trim().replace('"', "'"))
    });
    let repaired = trailing_comma()?.replace_all(&repaired, "$1");
    match serde_json::from_str(&repaired) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn fields_from_object(object: &Map<String, Value>) -> RecordFields {
    let text = |key: &str| object.get(key).and_then(clean);
    RecordFields {
        website: text("website"),
        sector: text("sector"),
        hq_location: text("hq_location").or_else(|| text("headquarters")),
        description: text("description"),
        key_people: object
            .get("key_people")
            .map(|v| named_entries(v, &["role", "title"]))
            .unwrap_or_default()
            .into_iter()
            .take(MAX_KEY_PEOPLE)
            .map(|(name, role)| Person { name, role })
            .collect(),
        competitors: object
            .get("competitors")
            .map(|v| named_entries(v, &["note", "description"]))
            .unwrap_or_default()
            .into_iter()
            .map(|(name, note)| CompetitorNote { name, note })
            .collect(),
        alternate_names: Vec::new(),
    }
}

/// A string value that is actually present
fn clean(value: &Value) -> Option<String> {
    let s = value.as_str()?.trim();
    let lowered = s.to_lowercase();
    if ABSENT_MARKERS.contains(&lowered.as_str()) {
        None
    } else {
        Some(s.to_string())
    }
}

/// `(name, detail)` pairs from a list of strings or objects
fn named_entries(value: &Value, detail_keys: &[&str]) -> Vec<(String, Option<String>)> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::String(_) => vec![value],
        _ => Vec::new(),
    };

    let mut entries: Vec<(String, Option<String>)> = Vec::new();
    for item in items {
        let entry = match item {
            Value::String(_) => clean(item).map(|name| (name, None)),
            Value::Object(map) => map.get("name").and_then(clean).map(|name| {
                let detail = detail_keys.iter().find_map(|k| map.get(*k).and_then(clean));
                (name, detail)
            }),
            _ => None,
        };
        if let Some((name, detail)) = entry {
            if !entries.iter().any(|(n, _)| same_name(n, &name)) {
                entries.push((name, detail));
            }
        }
    }
    entries
}

/// Web-search fallback client
pub struct WebSearchClient {
    http: HttpFetcher,
    url: String,
    api_key: String,
    model: String,
    max_searches: u32,
}

impl WebSearchClient {
    /// Create a client, reading the API key from the configured variable
    ///
    /// # Errors
    ///
    /// Returns `Fatal` when the key is not set.
    pub fn new(settings: &FallbackSettings, user_agent: &str) -> Result<Self, LookupError> {
        let api_key = settings.api_key().ok_or_else(|| {
            LookupError::Fatal(format!("environment variable {} is not set", settings.api_key_env))
        })?;
        Self::with_api_key(settings, user_agent, api_key)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(
        settings: &FallbackSettings,
        user_agent: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            http: HttpFetcher::new(WEB_SEARCH_SOURCE, &settings.source(), user_agent)?,
            url: ANTHROPIC_MESSAGES_URL.to_string(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            max_searches: settings.max_searches,
        })
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Request body for one lookup
    pub fn request_body(&self, request: &LookupRequest) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": 0,
            "messages": [ { "role": "user", "content": build_prompt(request) } ],
            "tools": [ {
                "type": WEB_SEARCH_TOOL,
                "name": "web_search",
                "max_uses": self.max_searches,
            } ],
        })
    }
}

#[async_trait]
impl SourceClient for WebSearchClient {
    fn id(&self) -> SourceId {
        SourceId::from(WEB_SEARCH_SOURCE)
    }

    fn confidence(&self) -> Confidence {
        Confidence::Low
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<PartialRecord, LookupError> {
        let body = self.request_body(request);
        let headers = [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ];
        let response = self.http.post_json(&self.url, &headers, &body).await?;

        let text = response_text(&response);
        if text.is_empty() {
            warn!("web search: empty answer for '{}'", request.name);
            return Err(LookupError::NotFound);
        }

        let fields = parse_profile(&text).ok_or(LookupError::NotFound)?;
        Ok(PartialRecord::new(self.id(), self.confidence(), fields))
    }
}
