//! Infrastructure layer - HTTP, HTML parsing, configuration, tables, logging

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod tables;

pub use config::CrawlerConfig;
pub use http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
