//! Application layer - crawl orchestration and result assembly

pub mod assembler;
pub mod crawler;

pub use crawler::{CrawlJob, CrawlOutcome};
