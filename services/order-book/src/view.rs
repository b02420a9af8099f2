//! Depth view for presentation consumers
//!
//! Projects a published snapshot onto the rows a ladder display needs: the
//! levels nearest the spread, each with the cumulative size from the spread
//! outward and that total as a share of the side's displayed size. Row
//! layout (which side is drawn on top, reversed bid order on wide screens)
//! is left to the renderer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::{Price, Size};

use crate::level::PriceLevel;
use crate::snapshot::BookSnapshot;

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRow {
    pub price: Price,
    pub size: Size,
    /// Running size from the spread up to and including this row.
    pub total: Size,
    /// `total` as a percentage of the side's displayed size, 2 decimal places.
    pub depth_percent: Decimal,
}

/// Display rows for both sides, ordered from the spread outward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthView {
    /// Lowest ask first.
    pub asks: Vec<DepthRow>,
    /// Highest bid first.
    pub bids: Vec<DepthRow>,
    pub spread: Option<Decimal>,
    /// Spread as a percentage of the best ask, 2 decimal places.
    pub spread_percent: Option<Decimal>,
}

impl DepthView {
    pub fn from_snapshot(snapshot: &BookSnapshot, display_depth: usize) -> Self {
        let asks: Vec<PriceLevel> = snapshot.asks.iter().rev().take(display_depth).copied().collect();
        let bids: Vec<PriceLevel> = snapshot.bids.iter().take(display_depth).copied().collect();

        let spread = match (snapshot.best_ask(), snapshot.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        };
        let spread_percent = spread.zip(snapshot.best_ask()).and_then(|(spread, ask)| {
            spread
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|scaled| scaled.checked_div(ask.as_decimal()))
                .map(|pct| pct.round_dp(2))
        });

        Self {
            asks: cumulative_rows(&asks),
            bids: cumulative_rows(&bids),
            spread,
            spread_percent,
        }
    }
}

fn cumulative_rows(levels: &[PriceLevel]) -> Vec<DepthRow> {
    let side_total: Size = levels.iter().map(|level| level.size).sum();
    let mut running = Size::ZERO;

    levels
        .iter()
        .map(|level| {
            running = running + level.size;
            let depth_percent = running
                .as_decimal()
                .checked_div(side_total.as_decimal())
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .map(|pct| pct.round_dp(2))
                .unwrap_or(Decimal::ZERO);
            DepthRow {
                price: level.price,
                size: level.size,
                total: running,
                depth_percent,
            }
        })
        .collect()
}
