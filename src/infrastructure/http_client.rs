//! HTTP client for web crawling
//!
//! A thin reqwest wrapper with a fixed browser-identity header and a
//! per-request timeout. Failures are classified by [`FetchError`]; every
//! failure kind is retryable until the per-link retry budget is exhausted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::defaults;

/// Fetch failure, carrying enough context for the failure table.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status}")]
    Status { status: u16, url: String },

    #[error("request failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Abstraction over page retrieval so the orchestrator can be exercised
/// against canned documents in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a URL and return the response body as HTML text.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client configuration for crawling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

/// Reqwest-backed [`PageFetcher`] used by real crawl runs.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| anyhow::anyhow!("invalid user agent: {e}"))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }
}
