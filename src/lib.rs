//! stalco-crawler - Batch crawl-and-extract pipeline
//!
//! Turns a spreadsheet of search links into an enriched product catalog by
//! resolving each search page to a canonical product page on stalco.pl and
//! extracting structured product fields from its markup.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;
