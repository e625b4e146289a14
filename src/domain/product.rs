//! Product extraction results
//!
//! A successfully crawled link yields exactly one [`ProductRecord`]; a link
//! that exhausted its retries yields exactly one [`FailureRecord`]. Never
//! both.

use serde::{Deserialize, Serialize};

/// Structured product data extracted from a single product page.
///
/// String fields degrade to an empty string when the page does not carry the
/// corresponding markup; prices keep the `"N/A"` sentinel instead so absent
/// pricing is distinguishable from a blank cell downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Search link this record was crawled from; join key back to the input
    /// table.
    pub search_link: String,
    /// Canonicalized product page URL.
    pub product_url: String,
    pub title: String,
    /// Inner markup of the short description container, kept verbatim so
    /// downstream consumers retain formatting.
    pub short_description_html: String,
    /// Inner markup of the full description tab.
    pub full_description_html: String,
    pub brand: String,
    pub sku: String,
    pub ean: String,
    pub price_gross: String,
    pub price_net: String,
    /// Image URLs in order of first appearance, duplicates dropped.
    pub images: Vec<String>,
    /// Video URLs in order of first appearance, duplicates dropped.
    pub videos: Vec<String>,
}

impl ProductRecord {
    /// Sentinel used for prices the page does not display.
    pub const PRICE_UNAVAILABLE: &'static str = "N/A";
}

/// A link that never produced a [`ProductRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub search_link: String,
    pub reason: String,
}
