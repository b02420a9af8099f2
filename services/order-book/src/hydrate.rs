//! Snapshot hydrator
//!
//! A full snapshot replaces the book wholesale. Each side is grouped with the
//! active grouping, stripped of non-live levels, sorted canonically and
//! bounded. Nothing from the previous book survives.

use types::numeric::Grouping;
use types::side::Side;

use crate::config::BookConfig;
use crate::depth::bound;
use crate::grouping::bucketize;
use crate::level::{sort_canonical, PriceLevel};

/// Build one canonical side from raw snapshot levels.
pub fn hydrate_side(
    levels: &[PriceLevel],
    grouping: Grouping,
    side: Side,
    config: &BookConfig,
) -> Vec<PriceLevel> {
    let rounding = config.grouping_policy.rounding(side);
    let mut grouped: Vec<PriceLevel> = bucketize(levels, grouping, rounding)
        .into_iter()
        .filter(|level| config.is_live(level.size))
        .collect();
    sort_canonical(&mut grouped);
    bound(grouped, config.retained_depth, side)
}

/// Build both sides from a snapshot, returning `(asks, bids)`.
pub fn hydrate(
    asks: &[PriceLevel],
    bids: &[PriceLevel],
    grouping: Grouping,
    config: &BookConfig,
) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
    (
        hydrate_side(asks, grouping, Side::Ask, config),
        hydrate_side(bids, grouping, Side::Bid, config),
    )
}
