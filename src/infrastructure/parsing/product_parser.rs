//! Product page extraction
//!
//! Applies the fixed selector set to a product page and produces a
//! [`ProductRecord`]. A missing title element fails the extraction; every
//! other field degrades gracefully to an empty value (prices to `"N/A"`).

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::ProductRecord;

use super::config::SiteSelectors;
use super::error::{ParsingError, ParsingResult};

/// Parser for extracting structured product fields from product pages.
pub struct ProductParser {
    title: Selector,
    short_description: Selector,
    full_description: Selector,
    detail_list_items: Selector,
    gallery_items: Selector,
    main_image: Selector,
    video_gallery: Selector,
    price_container: Selector,
    price_tax_excluded: Selector,
    price_tax_included: Selector,
    markers: SiteSelectors,
}

impl ProductParser {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            title: compile(&selectors.product_title)?,
            short_description: compile(&selectors.short_description)?,
            full_description: compile(&selectors.full_description)?,
            detail_list_items: compile(&selectors.detail_list_items)?,
            gallery_items: compile(&selectors.gallery_items)?,
            main_image: compile(&selectors.main_image)?,
            video_gallery: compile(&selectors.video_gallery)?,
            price_container: compile(&selectors.price_container)?,
            price_tax_excluded: compile(&selectors.price_tax_excluded)?,
            price_tax_included: compile(&selectors.price_tax_included)?,
            markers: selectors.clone(),
        })
    }

    /// Extract a product record from a fetched product page.
    pub fn extract(&self, product_url: &str, doc: &Html) -> ParsingResult<ProductRecord> {
        let title = doc
            .select(&self.title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| ParsingError::MissingTitle {
                url: product_url.to_string(),
            })?;

        let short_description_html = doc
            .select(&self.short_description)
            .next()
            .map(|el| el.inner_html())
            .unwrap_or_default();
        let full_description_html = doc
            .select(&self.full_description)
            .next()
            .map(|el| el.inner_html())
            .unwrap_or_default();

        let (images, videos) = self.extract_media(doc);
        let (price_gross, price_net) = self.extract_prices(doc);
        let (brand, sku, ean) = self.extract_details(doc);

        debug!("Extracted product: {}", title);

        Ok(ProductRecord {
            search_link: String::new(),
            product_url: product_url.to_string(),
            title,
            short_description_html,
            full_description_html,
            brand,
            sku,
            ean,
            price_gross,
            price_net,
            images,
            videos,
        })
    }

    /// Collect image and video URLs from the gallery, in order of first
    /// appearance with later duplicates dropped.
    fn extract_media(&self, doc: &Html) -> (Vec<String>, Vec<String>) {
        let mut images = Vec::new();
        let mut videos = Vec::new();

        for item in doc.select(&self.gallery_items) {
            if let Some(big_src) = item.value().attr("data-big_src") {
                let src = item.value().attr("data-src").unwrap_or("");
                if src.ends_with(&self.markers.video_extension) {
                    push_unique(&mut videos, src);
                } else {
                    push_unique(&mut images, big_src);
                }
            }
        }

        if let Some(src) = doc
            .select(&self.main_image)
            .next()
            .and_then(|el| el.value().attr("src"))
        {
            push_unique(&mut images, src);
        }

        if let Some(src) = doc
            .select(&self.video_gallery)
            .next()
            .and_then(|el| el.value().attr("src"))
        {
            push_unique(&mut videos, src);
        }

        (images, videos)
    }

    /// Read gross/net prices out of the price container.
    ///
    /// The tax-excluded element feeds the gross field and the tax-included
    /// element the net field, mirroring the site's own display convention.
    fn extract_prices(&self, doc: &Html) -> (String, String) {
        let mut price_gross = ProductRecord::PRICE_UNAVAILABLE.to_string();
        let mut price_net = ProductRecord::PRICE_UNAVAILABLE.to_string();

        let Some(container) = doc.select(&self.price_container).next() else {
            return (price_gross, price_net);
        };

        if let Some(el) = container.select(&self.price_tax_excluded).next() {
            price_gross = self.clean_price(&collapsed_text(&el));
        }
        if let Some(el) = container.select(&self.price_tax_included).next() {
            let text = collapsed_text(&el);
            let before_suffix = text
                .split(&self.markers.net_price_suffix)
                .next()
                .unwrap_or("");
            price_net = self.clean_price(before_suffix);
        }

        (price_gross, price_net)
    }

    fn clean_price(&self, text: &str) -> String {
        text.replace(&self.markers.currency_suffix, "")
            .trim()
            .to_string()
    }

    /// Scan the reference list for brand / catalog-number / EAN labels.
    ///
    /// Unmatched items are ignored; multiple matches for the same label
    /// overwrite sequentially, so the last one wins.
    fn extract_details(&self, doc: &Html) -> (String, String, String) {
        let mut brand = String::new();
        let mut sku = String::new();
        let mut ean = String::new();

        for item in doc.select(&self.detail_list_items) {
            let text = collapsed_text(&item);
            if text.contains(&self.markers.brand_label) {
                brand = strip_label(&text, &self.markers.brand_label);
            } else if text.contains(&self.markers.sku_label) {
                sku = strip_label(&text, &self.markers.sku_label);
            } else if text.contains(&self.markers.ean_label) {
                ean = strip_label(&text, &self.markers.ean_label);
            }
        }

        (brand, sku, ean)
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("invalid selector '{selector}': {e}"))
}

/// Text content with each segment trimmed, concatenated without separators.
fn collapsed_text(el: &ElementRef) -> String {
    el.text().map(str::trim).collect()
}

fn strip_label(text: &str, label: &str) -> String {
    text.replace(label, "")
        .trim_start_matches(':')
        .trim()
        .to_string()
}

fn push_unique(urls: &mut Vec<String>, url: &str) {
    if !urls.iter().any(|u| u == url) {
        urls.push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ProductParser {
        ProductParser::new(&SiteSelectors::default()).unwrap()
    }

    fn product_page() -> Html {
        Html::parse_document(
            r#"<html><body>
                <h1 class="product-page__title">
                    <span class="js-product-name-with-details">Młotek ślusarski 500g</span>
                </h1>
                <div class="product-page__short-description"><p>Krótki <b>opis</b></p></div>
                <div class="product-tabs__description"><ul><li>Pełny opis</li></ul></div>
                <ul class="product-details-top__reference-list">
                    <li>Marka: Stalco</li>
                    <li>Numer katalogowy: S-11222</li>
                    <li>EAN: 5906672411222</li>
                    <li>Gwarancja: 24 miesiące</li>
                </ul>
                <ul>
                    <li class="orbitvu-gallery-item">
                        <a class="orbitvu-gallery-item-link"
                           data-big_src="https://stalco.pl/img/1_big.jpg"
                           data-src="https://stalco.pl/img/1.jpg"></a>
                    </li>
                    <li class="orbitvu-gallery-item">
                        <a class="orbitvu-gallery-item-link"
                           data-big_src="https://stalco.pl/img/2_big.jpg"
                           data-src="https://stalco.pl/vid/demo.mp4"></a>
                    </li>
                    <li class="orbitvu-gallery-item">
                        <a class="orbitvu-gallery-item-link"
                           data-big_src="https://stalco.pl/img/1_big.jpg"
                           data-src="https://stalco.pl/img/1.jpg"></a>
                    </li>
                </ul>
                <img id="ovgallery-main-image" src="https://stalco.pl/img/1_big.jpg">
                <video class="video-gallery" src="https://stalco.pl/vid/main.mp4"></video>
                <div class="product-price">
                    <div class="price-tax-excluded">49,99 zł</div>
                    <div class="price-tax-included">40,64 zł Netto</div>
                </div>
            </body></html>"#,
        )
    }

    #[test]
    fn test_full_extraction() {
        let record = parser()
            .extract("https://stalco.pl/produkt/mlotek", &product_page())
            .unwrap();

        assert_eq!(record.title, "Młotek ślusarski 500g");
        assert_eq!(record.short_description_html, "<p>Krótki <b>opis</b></p>");
        assert!(record.full_description_html.contains("Pełny opis"));
        assert_eq!(record.brand, "Stalco");
        assert_eq!(record.sku, "S-11222");
        assert_eq!(record.ean, "5906672411222");
        assert_eq!(record.price_gross, "49,99");
        assert_eq!(record.price_net, "40,64");
    }

    #[test]
    fn test_media_deduplicated_in_encounter_order() {
        let record = parser()
            .extract("https://stalco.pl/produkt/mlotek", &product_page())
            .unwrap();

        // Main image duplicates a gallery entry and must not appear twice.
        assert_eq!(
            record.images,
            vec![
                "https://stalco.pl/img/1_big.jpg",
                "https://stalco.pl/img/2_big.jpg",
            ]
        );
        assert_eq!(
            record.videos,
            vec![
                "https://stalco.pl/vid/demo.mp4",
                "https://stalco.pl/vid/main.mp4",
            ]
        );
    }

    #[test]
    fn test_missing_title_fails() {
        let doc = Html::parse_document("<html><body><h1>404</h1></body></html>");
        let err = parser()
            .extract("https://stalco.pl/produkt/x", &doc)
            .unwrap_err();
        assert_eq!(
            err,
            ParsingError::MissingTitle {
                url: "https://stalco.pl/produkt/x".to_string()
            }
        );
    }

    #[test]
    fn test_missing_price_container_yields_sentinel() {
        let doc = Html::parse_document(
            r#"<h1 class="product-page__title">
                <span class="js-product-name-with-details">Produkt</span>
            </h1>"#,
        );
        let record = parser().extract("https://stalco.pl/produkt/x", &doc).unwrap();
        assert_eq!(record.price_gross, "N/A");
        assert_eq!(record.price_net, "N/A");
        assert_eq!(record.brand, "");
        assert!(record.images.is_empty());
    }

    #[test]
    fn test_detail_labels_last_match_wins() {
        let doc = Html::parse_document(
            r#"<h1 class="product-page__title">
                <span class="js-product-name-with-details">Produkt</span>
            </h1>
            <ul class="product-details-top__reference-list">
                <li>Marka: Pierwsza</li>
                <li>Marka: Druga</li>
            </ul>"#,
        );
        let record = parser().extract("https://stalco.pl/produkt/x", &doc).unwrap();
        assert_eq!(record.brand, "Druga");
    }
}
