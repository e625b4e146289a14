//! Selector configuration for the target site
//!
//! Centralizes every structural marker the crawl depends on: CSS selectors
//! for the listing and product pages plus the Polish label prefixes of the
//! detail list. These mirror the live stalco.pl markup.

use serde::{Deserialize, Serialize};

/// CSS selectors and label markers for stalco.pl pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Anchor inside the single product miniature of a listing page.
    pub listing_product_link: String,

    /// Product page title element; its absence fails extraction.
    pub product_title: String,
    pub short_description: String,
    pub full_description: String,

    /// List items carrying labeled brand / catalog number / EAN values.
    pub detail_list_items: String,

    /// Gallery item anchors carrying `data-big_src` / `data-src`.
    pub gallery_items: String,
    pub main_image: String,
    pub video_gallery: String,

    pub price_container: String,
    pub price_tax_excluded: String,
    pub price_tax_included: String,

    /// Label prefixes scanned in the detail list.
    pub brand_label: String,
    pub sku_label: String,
    pub ean_label: String,

    /// Suffix cut off the tax-included price text before the currency is
    /// stripped.
    pub net_price_suffix: String,
    /// Currency suffix removed from both price texts.
    pub currency_suffix: String,

    /// `data-src` values ending with this extension are videos, not images.
    pub video_extension: String,

    /// A URL fragment containing any of these markers selects a product
    /// variant and must be preserved by canonicalization.
    pub fragment_markers: Vec<String>,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            listing_product_link: "h2.product-miniature__title a".to_string(),

            product_title: "h1.product-page__title .js-product-name-with-details".to_string(),
            short_description: "div.product-page__short-description".to_string(),
            full_description: "div.product-tabs__description".to_string(),

            detail_list_items: "ul.product-details-top__reference-list li".to_string(),

            gallery_items: "li.orbitvu-gallery-item a.orbitvu-gallery-item-link".to_string(),
            main_image: "#ovgallery-main-image".to_string(),
            video_gallery: "video.video-gallery".to_string(),

            price_container: "div.product-price".to_string(),
            price_tax_excluded: "div.price-tax-excluded".to_string(),
            price_tax_included: "div.price-tax-included".to_string(),

            brand_label: "Marka".to_string(),
            sku_label: "Numer katalogowy".to_string(),
            ean_label: "EAN".to_string(),

            net_price_suffix: "Netto".to_string(),
            currency_suffix: "zł".to_string(),

            video_extension: ".mp4".to_string(),

            fragment_markers: vec!["rozmiar".to_string(), "typ".to_string()],
        }
    }
}
