//! Session event definitions
//!
//! Defines the `SessionEvent` enum: every input the session state machine
//! accepts. The transport layer classifies raw frames into these events
//! before they reach the core; the core never inspects message shape.

use serde::{Deserialize, Serialize};
use types::numeric::Grouping;

use crate::level::PriceLevel;

/// Inbound event for an order book session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    /// Transport connected; wait for a snapshot.
    OpenConnection,
    /// Transport dropped; discard the book.
    Disconnect,
    /// Transport or subscription failure.
    Error,
    /// Full snapshot for both sides.
    Hydrate {
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    },
    /// Incremental absolute-size deltas for both sides.
    UpdateOrders {
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    },
    /// Switch bucket width; the book is cleared.
    ChangeGrouping { grouping: Grouping },
    /// Fetch again after an error or on demand.
    Retry,
    /// Force the session into the error state.
    Kill,
    /// Leave loading without a snapshot.
    Resolve,
    /// Switch to the other product and reload.
    ToggleProduct,
    /// Return to the initial state from anywhere.
    Reset,
}

impl SessionEvent {
    /// Get the event type as a string label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            SessionEvent::OpenConnection => "OpenConnection",
            SessionEvent::Disconnect => "Disconnect",
            SessionEvent::Error => "Error",
            SessionEvent::Hydrate { .. } => "Hydrate",
            SessionEvent::UpdateOrders { .. } => "UpdateOrders",
            SessionEvent::ChangeGrouping { .. } => "ChangeGrouping",
            SessionEvent::Retry => "Retry",
            SessionEvent::Kill => "Kill",
            SessionEvent::Resolve => "Resolve",
            SessionEvent::ToggleProduct => "ToggleProduct",
            SessionEvent::Reset => "Reset",
        }
    }

    /// Number of price levels carried by the event.
    pub fn level_count(&self) -> usize {
        match self {
            SessionEvent::Hydrate { asks, bids } | SessionEvent::UpdateOrders { asks, bids } => {
                asks.len() + bids.len()
            }
            _ => 0,
        }
    }
}
