//! HTML parsing infrastructure
//!
//! Selector-based extraction against the fixed markup shape of the target
//! site. Any change to that markup is an external-compatibility break; the
//! parsers fail loudly rather than silently when the shape no longer
//! matches.

pub mod config;
pub mod error;
pub mod listing_parser;
pub mod product_parser;
pub mod url_cleaner;

pub use config::SiteSelectors;
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::ListingParser;
pub use product_parser::ProductParser;
pub use url_cleaner::UrlCleaner;
