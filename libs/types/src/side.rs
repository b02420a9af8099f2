//! Book side types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One half of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sell offers. Best price is the lowest.
    Ask,
    /// Buy offers. Best price is the highest.
    Bid,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Ask => "ask",
            Side::Bid => "bid",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
