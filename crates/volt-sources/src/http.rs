//! Rate-limited, retrying JSON-over-HTTP fetcher shared by the network clients

use crate::{LookupError, RetryPolicy, SourceLimiter, SourceSettings};
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Wait used when a 429 carries no usable `Retry-After`
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// HTTP access for one source
///
/// Every request waits on the source's shared limiter, runs under the
/// per-call deadline, and is wrapped in the source's retry policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: SourceLimiter,
    retry: RetryPolicy,
    timeout: Duration,
    label: String,
}

impl HttpFetcher {
    /// Build a fetcher from source settings
    ///
    /// # Errors
    ///
    /// Returns `Fatal` if the HTTP client cannot be constructed.
    pub fn new(
        label: impl Into<String>,
        settings: &SourceSettings,
        user_agent: &str,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| LookupError::Fatal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            limiter: SourceLimiter::new(settings.requests_per_second, settings.burst),
            retry: settings.retry.clone(),
            timeout: settings.timeout(),
            label: label.into(),
        })
    }

    /// Label used in logs
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The shared limiter
    pub fn limiter(&self) -> &SourceLimiter {
        &self.limiter
    }

    /// GET `url` with query parameters and decode the JSON body
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, LookupError> {
        self.retry
            .execute(&self.label, |attempt| {
                debug!("{}: GET {} (attempt {})", self.label, url, attempt);
                self.send(self.client.get(url).query(query))
            })
            .await
    }

    /// POST a JSON body with extra headers and decode the JSON reply
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, LookupError> {
        self.retry
            .execute(&self.label, |attempt| {
                debug!("{}: POST {} (attempt {})", self.label, url, attempt);
                let mut request = self.client.post(url).json(body);
                for (name, value) in headers {
                    request = request.header(*name, *value);
                }
                self.send(request)
            })
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, LookupError> {
        self.limiter.acquire().await;

        let exchange = async {
            let response = request.send().await.map_err(classify_transport)?;
            let status = response.status();
            if !status.is_success() {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .map(parse_retry_after);
                return Err(classify_status(status, retry_after));
            }

            let body = response.bytes().await.map_err(classify_transport)?;
            serde_json::from_slice(&body)
                .map_err(|e| LookupError::Fatal(format!("invalid JSON body: {}", e)))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| LookupError::Timeout)?
    }
}

/// Map a non-success HTTP status onto the lookup error taxonomy
pub fn classify_status(status: StatusCode, retry_after: Option<Duration>) -> LookupError {
    match status.as_u16() {
        404 => LookupError::NotFound,
        429 => LookupError::RateLimited {
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
        },
        408 | 500..=599 => LookupError::Transient(format!("HTTP {}", status.as_u16())),
        code => LookupError::Fatal(format!("HTTP {}", code)),
    }
}

/// Parse a `Retry-After` header given in seconds
pub fn parse_retry_after(value: &str) -> Duration {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn classify_transport(error: reqwest::Error) -> LookupError {
    if error.is_timeout() {
        LookupError::Timeout
    } else if error.is_decode() || error.is_builder() {
        LookupError::Fatal(error.to_string())
    } else {
        LookupError::Transient(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(classify_status(StatusCode::NOT_FOUND, None), LookupError::NotFound);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, None),
            LookupError::RateLimited { retry_after: DEFAULT_RETRY_AFTER }
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(7))),
            LookupError::RateLimited { retry_after: Duration::from_secs(7) }
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY, None),
            LookupError::Transient("HTTP 502".into())
        );
        assert_eq!(
            classify_status(StatusCode::REQUEST_TIMEOUT, None),
            LookupError::Transient("HTTP 408".into())
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, None),
            LookupError::Fatal("HTTP 403".into())
        );
    }

    #[test]
    fn test_retry_after_parsing() {
        assert_eq!(parse_retry_after("3"), Duration::from_secs(3));
        assert_eq!(parse_retry_after(" 10 "), Duration::from_secs(10));
        // HTTP-date form is not interpreted
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), DEFAULT_RETRY_AFTER);
    }

    #[test]
    fn test_fetcher_builds_from_defaults() {
        let fetcher = HttpFetcher::new("wikidata", &SourceSettings::default(), "volt/test").unwrap();
        assert_eq!(fetcher.label(), "wikidata");
        assert_eq!(fetcher.limiter().per_second(), 5);
    }
}
