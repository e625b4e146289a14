//! Crawl job orchestration
//!
//! Processes the deduplicated link set one link at a time: fetch the
//! listing page, resolve and canonicalize the product link, fetch the
//! product page, extract. Per-link failures degrade to a failure record and
//! the crawl continues; progress is observable through the job registry
//! after every link. Retry and snapshot-based resume are configured by
//! `retry_limit` and `resumable`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{FailureRecord, JobRegistry, ProductRecord, SeedTable};
use crate::infrastructure::config::CrawlerConfig;
use crate::infrastructure::http_client::{FetchError, PageFetcher};
use crate::infrastructure::parsing::{
    ListingParser, ParsingError, ProductParser, UrlCleaner,
};

/// Everything a finished (or resumed-then-finished) crawl accumulated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub records: Vec<ProductRecord>,
    pub failures: Vec<FailureRecord>,
}

/// Why a single link attempt failed. Never crosses the per-link boundary
/// as a panic or early return from the job.
#[derive(Error, Debug)]
enum LinkError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParsingError),
}

impl LinkError {
    /// A listing page without a product link is a deterministic parse
    /// outcome; retrying would fetch the same page again.
    fn is_retryable(&self) -> bool {
        !matches!(self, LinkError::Parse(ParsingError::NoProductFound))
    }
}

/// Orchestrator for one crawl job.
pub struct CrawlJob {
    job_id: String,
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    registry: JobRegistry,
    listing_parser: ListingParser,
    product_parser: ProductParser,
    url_cleaner: UrlCleaner,
    cancel: CancellationToken,
}

impl CrawlJob {
    pub fn new(
        job_id: String,
        config: CrawlerConfig,
        fetcher: Arc<dyn PageFetcher>,
        registry: JobRegistry,
    ) -> Result<Self> {
        let listing_parser = ListingParser::new(&config.selectors)?;
        let product_parser = ProductParser::new(&config.selectors)?;
        let url_cleaner = UrlCleaner::new(&config.base_url, &config.selectors.fragment_markers)?;

        Ok(Self {
            job_id,
            config,
            fetcher,
            registry,
            listing_parser,
            product_parser,
            url_cleaner,
            cancel: CancellationToken::new(),
        })
    }

    /// Token checked between link iterations; cancelling it stops the crawl
    /// cooperatively after the current link.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the crawl in a background task so the caller is never blocked.
    ///
    /// A catastrophic crawl error marks the job failed. The success path
    /// leaves the job in `Processing`: the host completes it once the
    /// results are persisted, since an unwritable output sink is just as
    /// fatal as an unreadable input.
    pub fn spawn(self, seeds: SeedTable) -> JoinHandle<Result<CrawlOutcome>> {
        tokio::spawn(async move {
            let job_id = self.job_id.clone();
            let registry = self.registry.clone();
            match self.run(&seeds).await {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    registry.fail(&job_id, &e.to_string()).await;
                    Err(e)
                }
            }
        })
    }

    /// Crawl every deduplicated link of the seed table.
    pub async fn run(&self, seeds: &SeedTable) -> Result<CrawlOutcome> {
        let mut targets = seeds.crawl_targets();
        let mut outcome = CrawlOutcome::default();

        if self.config.resumable {
            outcome = load_snapshot(&self.config.snapshot_path).await;
            if !outcome.records.is_empty() {
                let done: HashSet<&str> = outcome
                    .records
                    .iter()
                    .map(|r| r.search_link.as_str())
                    .collect();
                let before = targets.len();
                targets.retain(|link| !done.contains(link.as_str()));
                info!(
                    "Resuming crawl: {} links already completed, {} remaining",
                    before - targets.len(),
                    targets.len()
                );
            }
            // Links about to be reattempted must not keep a stale failure,
            // or a later success would leave both a record and a failure.
            let pending: HashSet<&str> = targets.iter().map(String::as_str).collect();
            outcome
                .failures
                .retain(|f| !pending.contains(f.search_link.as_str()));
        }

        let total = targets.len();
        self.registry.start_processing(&self.job_id, total).await;
        info!("Crawling {} unique search links", total);

        for (idx, link) in targets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Crawl cancelled after {} of {} links", idx, total);
                return Ok(outcome);
            }

            match self.process_link(link).await {
                Ok(record) => {
                    info!("Scraped product: {}", record.title);
                    outcome.records.push(record);
                    if self.config.resumable {
                        save_snapshot(&self.config.snapshot_path, &outcome).await;
                    }
                }
                Err(e) => {
                    warn!("Link failed: {} - {}", link, e);
                    outcome.failures.push(FailureRecord {
                        search_link: link.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            self.registry
                .update_progress(&self.job_id, idx + 1, outcome.failures.len())
                .await;

            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        if self.config.resumable {
            remove_snapshot(&self.config.snapshot_path).await;
        }

        Ok(outcome)
    }

    /// One link through the full pipeline, with bounded retry and backoff.
    async fn process_link(&self, link: &str) -> Result<ProductRecord, LinkError> {
        let mut attempt: u32 = 0;
        loop {
            match self.crawl_once(link).await {
                Ok(record) => return Ok(record),
                Err(e) if e.is_retryable() && attempt < self.config.retry_limit => {
                    attempt += 1;
                    warn!(
                        "Error on {}: {} - retry {}/{}",
                        link, e, attempt, self.config.retry_limit
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single attempt: listing fetch, link resolution, canonicalization,
    /// product fetch, extraction.
    async fn crawl_once(&self, link: &str) -> Result<ProductRecord, LinkError> {
        let listing_html = self.fetcher.fetch_html(link).await?;
        let product_url = {
            let doc = Html::parse_document(&listing_html);
            let href = self.listing_parser.resolve_product_link(&doc)?;
            self.url_cleaner.canonicalize(&href)
        };

        let product_html = self.fetcher.fetch_html(&product_url).await?;
        let mut record = {
            let doc = Html::parse_document(&product_html);
            self.product_parser.extract(&product_url, &doc)?
        };
        record.search_link = link.to_string();
        Ok(record)
    }
}

/// Load the snapshot left behind by an interrupted resumable run. An
/// unreadable snapshot starts the run from scratch rather than aborting.
async fn load_snapshot(path: &Path) -> CrawlOutcome {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Ignoring malformed snapshot {}: {}", path.display(), e);
                CrawlOutcome::default()
            }
        },
        Err(_) => CrawlOutcome::default(),
    }
}

/// Persist partial results after a success. A failed write only costs
/// resumability, so it is logged and the crawl continues.
async fn save_snapshot(path: &Path, outcome: &CrawlOutcome) {
    let json = match serde_json::to_string(outcome) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize snapshot: {}", e);
            return;
        }
    };
    if let Err(e) = tokio::fs::write(path, json).await {
        warn!("Failed to save snapshot {}: {}", path.display(), e);
    }
}

async fn remove_snapshot(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove snapshot {}: {}", path.display(), e);
        }
    }
}
