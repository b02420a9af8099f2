//! Grouping bucketizer
//!
//! Maps raw price levels onto coarser buckets of width `g` and sums the sizes
//! that land in the same bucket. The same rounding must be applied to the
//! held book and to every incoming batch, since the bucket price is the
//! merge key.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::{Grouping, Price};
use types::side::Side;

use crate::level::PriceLevel;

/// Direction a raw price is rounded to reach its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// `floor(price / g) * g`
    Floor,
    /// `ceil(price / g) * g`
    Ceil,
}

/// Per-side rounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// Both sides round down.
    #[default]
    Floor,
    /// Both sides round up.
    Ceil,
    /// Bids round down and asks round up, so buckets never cross the spread.
    TowardSpread,
}

impl GroupingPolicy {
    pub fn rounding(&self, side: Side) -> Rounding {
        match (self, side) {
            (GroupingPolicy::Floor, _) => Rounding::Floor,
            (GroupingPolicy::Ceil, _) => Rounding::Ceil,
            (GroupingPolicy::TowardSpread, Side::Bid) => Rounding::Floor,
            (GroupingPolicy::TowardSpread, Side::Ask) => Rounding::Ceil,
        }
    }
}

/// Compute the bucket a raw price falls into.
///
/// Falls back to the raw price if the division overflows.
pub fn bucket_price(price: Price, grouping: Grouping, rounding: Rounding) -> Price {
    let g = grouping.as_decimal();
    let Some(steps) = price.as_decimal().checked_div(g) else {
        return price;
    };
    let steps = match rounding {
        Rounding::Floor => steps.floor(),
        Rounding::Ceil => steps.ceil(),
    };
    steps
        .checked_mul(g)
        .and_then(|bucket| Price::try_new(bucket.max(Decimal::ZERO)))
        .unwrap_or(price)
}

/// Group raw levels into buckets, summing sizes per bucket.
///
/// Buckets appear in the order they are first seen; the output is not sorted.
pub fn bucketize(levels: &[PriceLevel], grouping: Grouping, rounding: Rounding) -> Vec<PriceLevel> {
    let mut grouped: Vec<PriceLevel> = Vec::with_capacity(levels.len());
    let mut index: BTreeMap<Price, usize> = BTreeMap::new();

    for level in levels {
        let bucket = bucket_price(level.price, grouping, rounding);
        match index.get(&bucket) {
            Some(&i) => grouped[i].size = grouped[i].size + level.size,
            None => {
                index.insert(bucket, grouped.len());
                grouped.push(PriceLevel::new(bucket, level.size));
            }
        }
    }

    grouped
}
