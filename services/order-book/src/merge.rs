//! Side merger
//!
//! Folds one batch of absolute-size deltas into one side of the book. Each
//! delta states the new total size at its price: a live size overwrites, a
//! size below the threshold removes. The result is re-sorted into canonical
//! (descending) order and bounded to the retained depth.
//!
//! The merger is a pure function: it never mutates its inputs and keeps no
//! state between calls. Uses `BTreeMap` keyed by bucket price so the working
//! set is both de-duplicated and ordered.

use std::collections::BTreeMap;

use types::numeric::{Grouping, Price, Size};
use types::side::Side;

use crate::config::BookConfig;
use crate::depth::bound;
use crate::grouping::bucketize;
use crate::level::PriceLevel;

/// Merge a delta batch into an existing side book.
///
/// `existing` is assumed to be grouped with `grouping` already; re-grouping
/// it is idempotent. Callers clear the side before the first merge after a
/// grouping change.
pub fn merge_side(
    existing: &[PriceLevel],
    deltas: &[PriceLevel],
    grouping: Grouping,
    side: Side,
    config: &BookConfig,
) -> Vec<PriceLevel> {
    if deltas.is_empty() {
        return existing.to_vec();
    }

    let rounding = config.grouping_policy.rounding(side);

    let mut working: BTreeMap<Price, Size> = BTreeMap::new();
    for level in bucketize(existing, grouping, rounding) {
        working.insert(level.price, level.size);
    }

    for delta in bucketize(deltas, grouping, rounding) {
        if config.is_live(delta.size) {
            working.insert(delta.price, delta.size);
        } else {
            working.remove(&delta.price);
        }
    }

    let merged: Vec<PriceLevel> = working
        .into_iter()
        .rev()
        .filter(|(_, size)| config.is_live(*size))
        .map(PriceLevel::from)
        .collect();

    bound(merged, config.retained_depth, side)
}
