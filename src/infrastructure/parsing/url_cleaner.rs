//! URL canonicalization
//!
//! Normalizes raw hrefs into a single well-formed absolute URL. This is a
//! total function: once the cleaner is constructed, canonicalization never
//! fails, and it is idempotent.

use anyhow::{Context, Result};
use regex::Regex;

/// Canonicalizes product URLs for one base origin.
#[derive(Debug, Clone)]
pub struct UrlCleaner {
    base_url: String,
    duplicated_origin: Regex,
    fragment_markers: Vec<String>,
}

impl UrlCleaner {
    pub fn new(base_url: &str, fragment_markers: &[String]) -> Result<Self> {
        // Sanity-check the configured origin up front.
        url::Url::parse(base_url)
            .with_context(|| format!("invalid base URL: {base_url}"))?;

        let escaped = regex::escape(base_url);
        let duplicated_origin = Regex::new(&format!("{escaped}({escaped})+"))
            .context("failed to compile duplicated-origin pattern")?;

        Ok(Self {
            base_url: base_url.to_string(),
            duplicated_origin,
            fragment_markers: fragment_markers.to_vec(),
        })
    }

    /// Normalize a raw href into an absolute, deduplicated URL with the
    /// fragment policy applied.
    ///
    /// Relative links get the base origin prepended; runs of repeated base
    /// origins produced by naive concatenation collapse to one; the fragment
    /// survives only when it carries a variant-selector marker.
    pub fn canonicalize(&self, raw: &str) -> String {
        let absolute = if raw.starts_with("http") {
            raw.to_string()
        } else {
            format!("{}{}", self.base_url, raw)
        };

        let collapsed = self
            .duplicated_origin
            .replace_all(&absolute, self.base_url.as_str())
            .into_owned();

        match collapsed.split_once('#') {
            Some((base, fragment))
                if !fragment.is_empty()
                    && self.fragment_markers.iter().any(|m| fragment.contains(m)) =>
            {
                format!("{base}#{fragment}")
            }
            Some((base, _)) => base.to_string(),
            None => collapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> UrlCleaner {
        UrlCleaner::new(
            "https://stalco.pl",
            &["rozmiar".to_string(), "typ".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_relative_href_gets_origin() {
        assert_eq!(
            cleaner().canonicalize("/produkt/mlotek-123"),
            "https://stalco.pl/produkt/mlotek-123"
        );
    }

    #[test]
    fn test_duplicated_origin_collapses() {
        assert_eq!(
            cleaner().canonicalize("https://stalco.plhttps://stalco.plhttps://stalco.pl/produkt/x"),
            "https://stalco.pl/produkt/x"
        );
    }

    #[test]
    fn test_variant_fragment_is_preserved() {
        assert_eq!(
            cleaner().canonicalize("/produkt/rekawice#rozmiar-10"),
            "https://stalco.pl/produkt/rekawice#rozmiar-10"
        );
        assert_eq!(
            cleaner().canonicalize("/produkt/wkretak#typ-plaski"),
            "https://stalco.pl/produkt/wkretak#typ-plaski"
        );
    }

    #[test]
    fn test_anchor_fragment_is_discarded() {
        assert_eq!(
            cleaner().canonicalize("https://stalco.pl/produkt/x#opinie"),
            "https://stalco.pl/produkt/x"
        );
        assert_eq!(
            cleaner().canonicalize("https://stalco.pl/produkt/x#"),
            "https://stalco.pl/produkt/x"
        );
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let cleaner = cleaner();
        let inputs = [
            "/produkt/mlotek-123",
            "https://stalco.plhttps://stalco.pl/produkt/x",
            "/produkt/rekawice#rozmiar-10",
            "https://stalco.pl/produkt/x#opinie",
            "https://inne.example/produkt",
            "",
        ];
        for raw in inputs {
            let once = cleaner.canonicalize(raw);
            assert_eq!(cleaner.canonicalize(&once), once, "input: {raw:?}");
        }
    }
}
