//! Depth bounder
//!
//! Truncates a canonically sorted side (descending by price) to the retained
//! window nearest the spread. The retained window is larger than the display
//! depth so that removals near the edge do not leave visible gaps.

use types::side::Side;

use crate::level::PriceLevel;

/// Keep at most `keep` levels closest to the spread.
///
/// Input must already be in canonical (descending) order and is never
/// reordered. Asks are best at the low end, so the tail is kept; bids are
/// best at the high end, so the head is kept.
pub fn bound(mut levels: Vec<PriceLevel>, keep: usize, side: Side) -> Vec<PriceLevel> {
    if levels.len() <= keep {
        return levels;
    }
    match side {
        Side::Ask => levels.split_off(levels.len() - keep),
        Side::Bid => {
            levels.truncate(keep);
            levels
        }
    }
}
