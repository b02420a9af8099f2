//! Price levels
//!
//! A level is the resting size at one price. Once grouped, the price is the
//! bucket key and is unique within a side book.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Size};

/// A single price level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceLevel {
    /// The price (or bucket price once grouped).
    pub price: Price,
    /// Resting size at this price.
    pub size: Size,
}

impl PriceLevel {
    pub fn new(price: Price, size: Size) -> Self {
        Self { price, size }
    }

    /// Shorthand for whole-number levels.
    pub fn from_u64(price: u64, size: u64) -> Self {
        Self::new(Price::from_u64(price), Size::from_u64(size))
    }

    /// Check if this level has no remaining size.
    pub fn is_empty(&self) -> bool {
        self.size.is_zero()
    }
}

impl From<(Price, Size)> for PriceLevel {
    fn from((price, size): (Price, Size)) -> Self {
        Self::new(price, size)
    }
}

/// Sort levels into canonical storage order: descending by price for both
/// sides. Equal prices keep their relative order.
pub fn sort_canonical(levels: &mut [PriceLevel]) {
    levels.sort_by(|a, b| b.price.cmp(&a.price));
}
