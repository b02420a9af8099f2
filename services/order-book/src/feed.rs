//! Feed codec for the `book_ui_1` price-level feed
//!
//! Classifies raw JSON frames from the transport into snapshot, delta,
//! control or error messages and turns them into session events. This is
//! the only place that looks at message shape; the session receives events
//! already tagged as `Hydrate` or `UpdateOrders`.
//!
//! Frame formats:
//! - `{"feed":"book_ui_1_snapshot","product_id":"PI_XBTUSD","asks":[[p,s],..],"bids":[..]}`
//! - `{"feed":"book_ui_1","product_id":"PI_XBTUSD","asks":[[p,s],..],"bids":[..]}`
//! - `{"event":"info"|"subscribed"|"unsubscribed"|"alert",..}`
//! - `{"event":"error","message":"..."}`
//!
//! A level entry that is not a `[price, size]` pair of non-negative numbers
//! (JSON numbers or numeric strings) is skipped; the rest of the batch is kept.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use types::errors::ProductError;
use types::numeric::{Price, Size};
use types::product::ProductId;

use crate::events::SessionEvent;
use crate::level::PriceLevel;

/// Feed name for incremental updates.
pub const BOOK_FEED: &str = "book_ui_1";
/// Feed name for full snapshots.
pub const BOOK_SNAPSHOT_FEED: &str = "book_ui_1_snapshot";

/// Errors that can occur while decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid JSON frame: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unknown feed: {0}")]
    UnknownFeed(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("frame has neither a feed nor an event field")]
    Unclassified,

    #[error("book frame without product_id")]
    MissingProduct,

    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Raw frame layout; every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct RawFrame {
    feed: Option<String>,
    event: Option<String>,
    product_id: Option<String>,
    #[serde(default)]
    asks: Vec<Value>,
    #[serde(default)]
    bids: Vec<Value>,
    message: Option<String>,
}

/// A classified feed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    Snapshot {
        product: ProductId,
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    },
    Delta {
        product: ProductId,
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    },
    /// Informational frame with no effect on the book.
    Control { event: String },
    /// Exchange-reported failure.
    Error { message: String },
}

impl FeedMessage {
    /// Convert into a session event for a session currently on `active`.
    ///
    /// Control frames and book frames for another product yield `None`.
    pub fn into_event(self, active: ProductId) -> Option<SessionEvent> {
        match self {
            FeedMessage::Snapshot { product, asks, bids } if product == active => {
                Some(SessionEvent::Hydrate { asks, bids })
            }
            FeedMessage::Delta { product, asks, bids } if product == active => {
                Some(SessionEvent::UpdateOrders { asks, bids })
            }
            FeedMessage::Snapshot { product, .. } | FeedMessage::Delta { product, .. } => {
                debug!(%product, %active, "Dropping frame for inactive product");
                None
            }
            FeedMessage::Control { .. } => None,
            FeedMessage::Error { .. } => Some(SessionEvent::Error),
        }
    }
}

/// Decode and classify one raw frame.
pub fn parse_frame(raw: &str) -> Result<FeedMessage, FeedError> {
    let frame: RawFrame = serde_json::from_str(raw)?;

    if let Some(event) = frame.event {
        return match event.as_str() {
            "error" => Ok(FeedMessage::Error {
                message: frame.message.unwrap_or_default(),
            }),
            "info" | "subscribed" | "unsubscribed" | "alert" => Ok(FeedMessage::Control {
                event: event.clone(),
            }),
            _ => Err(FeedError::UnknownEvent(event.clone())),
        };
    }

    let feed = frame.feed.ok_or(FeedError::Unclassified)?;
    let is_snapshot = match feed.as_str() {
        BOOK_SNAPSHOT_FEED => true,
        BOOK_FEED => false,
        _ => return Err(FeedError::UnknownFeed(feed)),
    };

    let product: ProductId = frame
        .product_id
        .ok_or(FeedError::MissingProduct)?
        .parse()?;
    let asks = parse_levels(&frame.asks, "asks");
    let bids = parse_levels(&frame.bids, "bids");

    Ok(if is_snapshot {
        FeedMessage::Snapshot { product, asks, bids }
    } else {
        FeedMessage::Delta { product, asks, bids }
    })
}

/// Parse `[price, size]` entries, skipping malformed ones.
pub fn parse_levels(entries: &[Value], side_label: &str) -> Vec<PriceLevel> {
    let mut levels = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;

    for entry in entries {
        match parse_level(entry) {
            Some(level) => levels.push(level),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            side = side_label,
            skipped,
            kept = levels.len(),
            "Skipped malformed level entries"
        );
    }

    levels
}

fn parse_level(entry: &Value) -> Option<PriceLevel> {
    let pair = entry.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let price = Price::try_new(parse_decimal(&pair[0])?)?;
    let size = Size::try_new(parse_decimal(&pair[1])?)?;
    Some(PriceLevel::new(price, size))
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Some(Decimal::from(u));
            }
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .ok(),
        _ => None,
    }
}

/// Outbound subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// "subscribe" or "unsubscribe"
    pub event: String,
    pub feed: String,
    pub product_ids: Vec<String>,
}

impl SubscriptionRequest {
    pub fn subscribe(product: ProductId) -> Self {
        Self {
            event: "subscribe".to_string(),
            feed: BOOK_FEED.to_string(),
            product_ids: vec![product.wire_name().to_string()],
        }
    }

    pub fn unsubscribe(product: ProductId) -> Self {
        Self {
            event: "unsubscribe".to_string(),
            feed: BOOK_FEED.to_string(),
            product_ids: vec![product.wire_name().to_string()],
        }
    }

    pub fn to_json(&self) -> Result<String, FeedError> {
        Ok(serde_json::to_string(self)?)
    }
}
