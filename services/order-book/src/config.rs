//! Configuration for order book sessions
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the standard 30-level retained buffer behind a 15-row display.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::Size;
use types::product::ProductId;

use crate::grouping::GroupingPolicy;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration shared by the merger, hydrator and session actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Maximum levels kept per side after every merge or hydration.
    pub retained_depth: usize,
    /// Rows per side handed to the presentation layer.
    pub display_depth: usize,
    /// Sizes below this are treated as removals. Zero sizes are always removals.
    pub min_size: Decimal,
    /// Rounding applied when bucketing raw prices.
    pub grouping_policy: GroupingPolicy,
    /// Product a new session starts on.
    pub default_product: ProductId,
    /// Capacity of the session actor's inbound event queue.
    pub channel_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            retained_depth: 30,
            display_depth: 15,
            min_size: Decimal::ZERO,
            grouping_policy: GroupingPolicy::default(),
            default_product: ProductId::default(),
            channel_capacity: 1024,
        }
    }
}

impl BookConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: BookConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_depth == 0 {
            return Err(ConfigError::Invalid("display_depth must be positive".into()));
        }
        if self.retained_depth < self.display_depth {
            return Err(ConfigError::Invalid(format!(
                "retained_depth ({}) must be at least display_depth ({})",
                self.retained_depth, self.display_depth
            )));
        }
        if self.min_size < Decimal::ZERO {
            return Err(ConfigError::Invalid("min_size must not be negative".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive".into()));
        }
        Ok(())
    }

    /// Whether a level of this size belongs in a canonical side book.
    pub fn is_live(&self, size: Size) -> bool {
        let size = size.as_decimal();
        size > Decimal::ZERO && size >= self.min_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BookConfig::default();
        assert_eq!(config.retained_depth, 30);
        assert_eq!(config.display_depth, 15);
        assert_eq!(config.default_product, ProductId::XbtUsd);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = BookConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BookConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = BookConfig::from_json_str(
            r#"{"retained_depth": 50, "grouping_policy": "toward_spread", "default_product": "PI_ETHUSD"}"#,
        )
        .unwrap();
        assert_eq!(config.retained_depth, 50);
        assert_eq!(config.display_depth, 15);
        assert_eq!(config.grouping_policy, GroupingPolicy::TowardSpread);
        assert_eq!(config.default_product, ProductId::EthUsd);
    }

    #[test]
    fn test_retained_below_display_rejected() {
        let result = BookConfig::from_json_str(r#"{"retained_depth": 10}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = BookConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = BookConfig::from_json_file("/nonexistent/book.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_is_live_threshold() {
        let mut config = BookConfig::default();
        assert!(!config.is_live(Size::ZERO));
        assert!(config.is_live(Size::from_u64(1)));

        config.min_size = Decimal::from(1);
        assert!(!config.is_live("0.5".parse().unwrap()));
        assert!(config.is_live(Size::from_u64(1)));
    }
}
