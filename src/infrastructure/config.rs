//! Crawler configuration
//!
//! Defaults mirror the observed behavior against the target site; a JSON
//! config file can override any of them for a run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::parsing::config::SiteSelectors;

/// Built-in defaults for the target site.
pub mod defaults {
    pub const BASE_URL: &str = "https://stalco.pl";
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
    pub const TIMEOUT_SECONDS: u64 = 10;
    pub const RETRY_LIMIT: u32 = 2;
    pub const REQUEST_DELAY_MS: u64 = 400;
    pub const RETRY_BACKOFF_MS: u64 = 1000;
    pub const SNAPSHOT_PATH: &str = "stalco_snapshot.json";
}

/// Complete crawl configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Origin prepended to relative hrefs and collapsed when duplicated.
    pub base_url: String,

    /// Browser-identity header sent with every request.
    pub user_agent: String,

    /// Per-request timeout in seconds. No timeout governs the job as a
    /// whole.
    pub timeout_seconds: u64,

    /// Retry attempts per link after the first; 0 disables retry.
    pub retry_limit: u32,

    /// Pacing delay between links, applied regardless of outcome.
    pub request_delay_ms: u64,

    /// Backoff sleep between retry attempts for the same link.
    pub retry_backoff_ms: u64,

    /// Persist partial results after every success and reload them at
    /// startup, skipping already-completed links.
    pub resumable: bool,

    /// Snapshot file used when `resumable` is on.
    pub snapshot_path: PathBuf,

    /// CSS selectors and label markers of the target site.
    pub selectors: SiteSelectors,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::TIMEOUT_SECONDS,
            retry_limit: defaults::RETRY_LIMIT,
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            retry_backoff_ms: defaults::RETRY_BACKOFF_MS,
            resumable: true,
            snapshot_path: PathBuf::from(defaults::SNAPSHOT_PATH),
            selectors: SiteSelectors::default(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a JSON file, falling back to defaults for
    /// any omitted field.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded crawler config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.base_url, "https://stalco.pl");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.retry_limit, 2);
        assert!(config.resumable);
    }

    #[tokio::test]
    async fn test_partial_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"retry_limit": 0, "resumable": false}"#)
            .await
            .unwrap();

        let config = CrawlerConfig::load(&path).await.unwrap();
        assert_eq!(config.retry_limit, 0);
        assert!(!config.resumable);
        assert_eq!(config.base_url, "https://stalco.pl");
    }
}
