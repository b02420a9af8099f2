//! Tradable products and their grouping options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{GroupingError, ProductError};
use crate::numeric::Grouping;

/// Perpetual products served by the book feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductId {
    #[serde(rename = "PI_XBTUSD")]
    XbtUsd,
    #[serde(rename = "PI_ETHUSD")]
    EthUsd,
}

impl ProductId {
    /// Identifier used on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ProductId::XbtUsd => "PI_XBTUSD",
            ProductId::EthUsd => "PI_ETHUSD",
        }
    }

    /// Grouping increments offered for this product, finest first.
    pub fn grouping_options(&self) -> Vec<Grouping> {
        match self {
            ProductId::XbtUsd => vec![
                Grouping::from_scaled(5, 1),
                Grouping::from_scaled(1, 0),
                Grouping::from_scaled(25, 1),
            ],
            ProductId::EthUsd => vec![
                Grouping::from_scaled(5, 2),
                Grouping::from_scaled(1, 1),
                Grouping::from_scaled(25, 2),
            ],
        }
    }

    /// The finest grouping offered; used when a session switches to this product.
    pub fn default_grouping(&self) -> Grouping {
        match self {
            ProductId::XbtUsd => Grouping::from_scaled(5, 1),
            ProductId::EthUsd => Grouping::from_scaled(5, 2),
        }
    }

    /// Check that `grouping` is one of this product's options.
    pub fn validate_grouping(&self, grouping: Grouping) -> Result<Grouping, GroupingError> {
        if self.grouping_options().contains(&grouping) {
            Ok(grouping)
        } else {
            Err(GroupingError::NotOffered {
                product: self.wire_name().to_string(),
                grouping: grouping.to_string(),
            })
        }
    }

    /// The product a toggle switches to.
    pub fn toggled(&self) -> Self {
        match self {
            ProductId::XbtUsd => ProductId::EthUsd,
            ProductId::EthUsd => ProductId::XbtUsd,
        }
    }
}

impl Default for ProductId {
    fn default() -> Self {
        ProductId::XbtUsd
    }
}

impl FromStr for ProductId {
    type Err = ProductError;

    /// Accepts the wire name (`PI_XBTUSD`) or the bare symbol (`XBTUSD`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("PI_").to_ascii_uppercase().as_str() {
            "XBTUSD" => Ok(ProductId::XbtUsd),
            "ETHUSD" => Ok(ProductId::EthUsd),
            _ => Err(ProductError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
