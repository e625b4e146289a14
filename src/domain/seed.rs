//! Seed table and link deduplication policy
//!
//! The input table must carry a `PRODUCT_MASTER` grouping column and a
//! `Search Link` column; every other column is opaque passthrough data that
//! the result assembler preserves verbatim.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grouping column; the `"0"` value is a sentinel meaning "not grouped".
pub const MASTER_COLUMN: &str = "PRODUCT_MASTER";
/// Join key column holding the search page URL for each row.
pub const SEARCH_LINK_COLUMN: &str = "Search Link";

/// Master key sentinel for rows without a declared product grouping.
pub const UNGROUPED_MASTER: &str = "0";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("input table is missing required column '{0}'")]
    MissingColumn(String),
}

/// The input table, loaded once and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    master_idx: usize,
    link_idx: usize,
}

impl SeedTable {
    /// Build a seed table from raw header and row data, validating that the
    /// required columns are present.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, MergeError> {
        let master_idx = headers
            .iter()
            .position(|h| h == MASTER_COLUMN)
            .ok_or_else(|| MergeError::MissingColumn(MASTER_COLUMN.to_string()))?;
        let link_idx = headers
            .iter()
            .position(|h| h == SEARCH_LINK_COLUMN)
            .ok_or_else(|| MergeError::MissingColumn(SEARCH_LINK_COLUMN.to_string()))?;

        Ok(Self {
            headers,
            rows,
            master_idx,
            link_idx,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Search link of a single row; empty when the row is shorter than the
    /// header (ragged CSV input).
    pub fn search_link<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.link_idx).map(String::as_str).unwrap_or("")
    }

    fn master_key<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.master_idx).map(String::as_str).unwrap_or("")
    }

    /// Derive the deduplicated set of links to crawl.
    ///
    /// Rows with the ungrouped sentinel master key contribute their link
    /// individually; for any other master key only the first row of the
    /// group is crawled, since the rest are variants of the same product.
    /// Duplicate links across groups collapse to one crawl target. Order is
    /// first appearance, which keeps progress counts deterministic within a
    /// run.
    pub fn crawl_targets(&self) -> Vec<String> {
        let mut targets = Vec::new();
        let mut seen_links: HashSet<&str> = HashSet::new();
        let mut seen_masters: HashSet<&str> = HashSet::new();

        for row in &self.rows {
            let master = self.master_key(row);
            let link = self.search_link(row);
            if link.is_empty() {
                continue;
            }

            let representative =
                master == UNGROUPED_MASTER || seen_masters.insert(master);
            if representative && seen_links.insert(link) {
                targets.push(link.to_string());
            }
        }

        targets
    }
}
