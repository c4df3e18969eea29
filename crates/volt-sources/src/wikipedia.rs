//! Encyclopedia summary client (Wikipedia REST)

use crate::{HttpFetcher, LookupError, LookupRequest, SourceClient, SourceSettings, WIKIPEDIA_SOURCE};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;
use volt_domain::{Confidence, PartialRecord, RecordFields, SourceId};

/// Page summary endpoint; the title is appended as one path segment
pub const WIKIPEDIA_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// A usable page summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Display title of the page
    pub title: String,
    /// Plain-text lead extract
    pub extract: String,
}

/// Read a summary response
///
/// Disambiguation pages and empty extracts are not summaries.
pub fn parse_summary(response: &Value) -> Option<Summary> {
    if response.get("type").and_then(Value::as_str) == Some("disambiguation") {
        return None;
    }
    let extract = response.get("extract")?.as_str()?.trim();
    if extract.is_empty() {
        return None;
    }
    let title = response
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    Some(Summary {
        title,
        extract: extract.to_string(),
    })
}

/// Summary URL for a page title
pub fn summary_url(base: &str, title: &str) -> Result<Url, LookupError> {
    let mut url = Url::parse(base).map_err(|e| LookupError::Fatal(format!("bad base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| LookupError::Fatal(format!("base URL cannot take a path: {}", base)))?
        .push(&title.trim().replace(' ', "_"));
    Ok(url)
}

/// Encyclopedia summary client
pub struct WikipediaClient {
    http: HttpFetcher,
    summary_url: String,
}

impl WikipediaClient {
    /// Create a client against the public endpoint
    pub fn new(settings: &SourceSettings, user_agent: &str) -> Result<Self, LookupError> {
        Ok(Self {
            http: HttpFetcher::new(WIKIPEDIA_SOURCE, settings, user_agent)?,
            summary_url: WIKIPEDIA_SUMMARY_URL.to_string(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, summary_url: impl Into<String>) -> Self {
        self.summary_url = summary_url.into();
        self
    }

    async fn summary(&self, title: &str) -> Result<Option<Summary>, LookupError> {
        let url = summary_url(&self.summary_url, title)?;
        match self.http.get_json(url.as_str(), &[]).await {
            Ok(response) => Ok(parse_summary(&response)),
            Err(LookupError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SourceClient for WikipediaClient {
    fn id(&self) -> SourceId {
        SourceId::from(WIKIPEDIA_SOURCE)
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<PartialRecord, LookupError> {
        for name in request.names() {
            let Some(summary) = self.summary(name).await? else {
                continue;
            };
            debug!("wikipedia: '{}' resolved to page '{}'", name, summary.title);

            let fields = RecordFields {
                description: Some(summary.extract),
                alternate_names: if summary.title.is_empty() {
                    Vec::new()
                } else {
                    vec![summary.title]
                },
                ..Default::default()
            };
            return Ok(PartialRecord::new(self.id(), self.confidence(), fields));
        }
        Err(LookupError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_standard_summary() {
        let response = json!({
            "type": "standard",
            "title": "Stripe, Inc.",
            "extract": "Stripe, Inc. is an Irish-American multinational financial services company."
        });
        let summary = parse_summary(&response).unwrap();
        assert_eq!(summary.title, "Stripe, Inc.");
        assert!(summary.extract.starts_with("Stripe, Inc. is"));
    }

    #[test]
    fn test_disambiguation_is_not_a_summary() {
        let response = json!({
            "type": "disambiguation",
            "title": "Apple",
            "extract": "Apple may refer to:"
        });
        assert_eq!(parse_summary(&response), None);
    }

    #[test]
    fn test_empty_extract_is_not_a_summary() {
        assert_eq!(parse_summary(&json!({ "type": "standard", "title": "X", "extract": "  " })), None);
        assert_eq!(parse_summary(&json!({ "title": "X" })), None);
    }

    #[test]
    fn test_summary_url_encodes_title() {
        let url = summary_url(WIKIPEDIA_SUMMARY_URL, "AT&T Inc./Mobility").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/AT&T_Inc.%2FMobility"
        );

        let url = summary_url(WIKIPEDIA_SUMMARY_URL, "Procter & Gamble").unwrap();
        assert!(url.as_str().ends_with("/summary/Procter_&_Gamble"));
    }
}
