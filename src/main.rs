//! Standalone batch crawl
//!
//! Reads an input CSV of search links, runs one crawl job to completion and
//! writes the merged result table plus, when any link failed, a separate
//! failure table.
//!
//! Usage: `stalco-crawler [input.csv] [results.csv] [failed.csv]`
//!
//! Set `STALCO_CRAWLER_CONFIG` to a JSON file to override the built-in
//! crawl configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use stalco_crawler::application::{assembler, CrawlJob};
use stalco_crawler::domain::JobRegistry;
use stalco_crawler::infrastructure::http_client::{HttpClient, HttpClientConfig};
use stalco_crawler::infrastructure::{logging, tables, CrawlerConfig};

const DEFAULT_INPUT: &str = "products.csv";
const DEFAULT_OUTPUT: &str = "stalco_scraped_results.csv";
const DEFAULT_FAILED: &str = "stalco_failed_links.csv";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let failed_output = args.next().unwrap_or_else(|| DEFAULT_FAILED.to_string());

    let config = match std::env::var("STALCO_CRAWLER_CONFIG") {
        Ok(path) => CrawlerConfig::load(&path).await?,
        Err(_) => CrawlerConfig::default(),
    };

    let registry = JobRegistry::new();
    let job_id = registry.create().await;

    let seeds = match tables::load_seed_table(&input) {
        Ok(seeds) => seeds,
        Err(e) => {
            registry.fail(&job_id, &e.to_string()).await;
            return Err(e);
        }
    };

    let fetcher = HttpClient::new(HttpClientConfig {
        user_agent: config.user_agent.clone(),
        timeout_seconds: config.timeout_seconds,
        follow_redirects: true,
    })?;

    let job = CrawlJob::new(job_id.clone(), config, Arc::new(fetcher), registry.clone())?;
    let outcome = job
        .spawn(seeds.clone())
        .await
        .context("crawl task panicked")??;

    let merged = assembler::merge(&seeds, &outcome.records);
    if let Err(e) = tables::write_table(&output, &merged) {
        registry.fail(&job_id, &e.to_string()).await;
        return Err(e);
    }

    if !outcome.failures.is_empty() {
        let failures = assembler::failure_table(&outcome.failures);
        if let Err(e) = tables::write_table(&failed_output, &failures) {
            registry.fail(&job_id, &e.to_string()).await;
            return Err(e);
        }
        info!(
            "{} failed links saved to: {}",
            outcome.failures.len(),
            failed_output
        );
    }

    registry.complete(&job_id).await;
    info!(
        "Scraped {} products from {} input rows; results saved to: {}",
        outcome.records.len(),
        seeds.len(),
        output
    );
    Ok(())
}
