//! Published book snapshots
//!
//! After every applied transition the session actor publishes an immutable
//! `BookSnapshot`. Consumers receive it behind an `Arc` and can never reach
//! back into the live session.

use serde::{Deserialize, Serialize};
use types::ids::SessionId;
use types::numeric::{Grouping, Price};
use types::product::ProductId;

use crate::level::PriceLevel;
use crate::machine::{BookState, Session};

/// A point-in-time view of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub session_id: SessionId,
    /// Number of transitions applied when this snapshot was taken.
    pub revision: u64,
    pub state: BookState,
    /// Ask levels, descending by price.
    pub asks: Vec<PriceLevel>,
    /// Bid levels, descending by price.
    pub bids: Vec<PriceLevel>,
    pub active_grouping: Grouping,
    pub active_product_id: ProductId,
    pub has_error: bool,
}

impl BookSnapshot {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            revision: session.revision(),
            state: session.state(),
            asks: session.asks().to_vec(),
            bids: session.bids().to_vec(),
            active_grouping: session.grouping(),
            active_product_id: session.product(),
            has_error: session.has_error(),
        }
    }

    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.last().map(|level| level.price)
    }

    /// Highest bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|level| level.price)
    }
}
