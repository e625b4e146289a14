//! Listing page link resolution
//!
//! A search/listing page is expected to point at exactly one product of
//! interest. The resolver returns its raw href; the caller canonicalizes.

use anyhow::Result;
use scraper::{Html, Selector};

use super::config::SiteSelectors;
use super::error::{ParsingError, ParsingResult};

/// Locates the canonical product link on a listing page.
pub struct ListingParser {
    product_link: Selector,
}

impl ListingParser {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        let product_link = Selector::parse(&selectors.listing_product_link).map_err(|e| {
            anyhow::anyhow!(
                "invalid listing selector '{}': {e}",
                selectors.listing_product_link
            )
        })?;
        Ok(Self { product_link })
    }

    /// Href of the product link element, or `NoProductFound` when the
    /// element or its href attribute is absent.
    pub fn resolve_product_link(&self, doc: &Html) -> ParsingResult<String> {
        let element = doc
            .select(&self.product_link)
            .next()
            .ok_or(ParsingError::NoProductFound)?;
        let href = element
            .value()
            .attr("href")
            .ok_or(ParsingError::NoProductFound)?;
        Ok(href.to_string())
    }
}
