//! Error types shared across the order book crates
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Grouping increment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Grouping must be positive, got {0}")]
    NonPositive(String),

    #[error("Grouping is not a number: {0}")]
    Unparsable(String),

    #[error("Grouping {grouping} is not offered for {product}")]
    NotOffered { product: String, grouping: String },
}

/// Product lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("Unknown product: {0}")]
    Unknown(String),
}
