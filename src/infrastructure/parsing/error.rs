//! Parsing error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// The listing page carries no product link element, or the element has
    /// no href. The display text is recorded verbatim in the failure table.
    #[error("No product found")]
    NoProductFound,

    /// The product page lacks its title element. This is the sole hard
    /// extraction precondition; every other field degrades to an empty
    /// value.
    #[error("Could not find product title at {url}")]
    MissingTitle { url: String },
}

pub type ParsingResult<T> = Result<T, ParsingError>;
