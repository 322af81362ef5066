//! Collection schedule and market qualification thresholds.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Longest accepted collection interval: one week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Largest liquidity minimum whose order-book request stays within the
/// 200-record page cap (`min / 2 + 1` entries per side).
pub const MAX_ORDERBOOK_ITEMS: u32 = 398;

/// Collector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Minutes between collection cycles. Also the price cache TTL.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Hours of trade history aggregated per cycle.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// Number of markets published per snapshot.
    #[serde(default = "default_top_count")]
    pub top_count: usize,
    /// Minimum trades within `activity_window_hours` for a market to qualify.
    /// Zero disables the activity filter.
    #[serde(default = "default_min_recent_trades")]
    pub min_recent_trades: usize,
    /// Hours of per-market history counted by the activity filter.
    #[serde(default = "default_activity_window_hours")]
    pub activity_window_hours: u32,
    /// Minimum bids + asks for a market to qualify. Zero disables the
    /// liquidity filter.
    #[serde(default = "default_min_orderbook_items")]
    pub min_orderbook_items: u32,
    /// Base prices below this flip a non-native market to its inverse.
    #[serde(default = "default_inversion_price_threshold")]
    pub inversion_price_threshold: Decimal,
}

const fn default_interval_minutes() -> u64 {
    5
}

const fn default_window_hours() -> u32 {
    24
}

const fn default_top_count() -> usize {
    12
}

const fn default_min_recent_trades() -> usize {
    10
}

const fn default_activity_window_hours() -> u32 {
    24
}

const fn default_min_orderbook_items() -> u32 {
    10
}

fn default_inversion_price_threshold() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl CollectorConfig {
    /// Time between collection cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        if self.interval_minutes == 0 {
            return Err(positive("interval_minutes"));
        }
        if self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "interval_minutes",
                reason: format!("must be at most {MAX_INTERVAL_MINUTES}"),
            }
            .into());
        }
        if self.window_hours == 0 {
            return Err(positive("window_hours"));
        }
        if self.top_count == 0 {
            return Err(positive("top_count"));
        }
        if self.min_recent_trades > 0 && self.activity_window_hours == 0 {
            return Err(positive("activity_window_hours"));
        }
        if self.min_orderbook_items > MAX_ORDERBOOK_ITEMS {
            return Err(ConfigError::InvalidValue {
                field: "min_orderbook_items",
                reason: format!("must be at most {MAX_ORDERBOOK_ITEMS}"),
            }
            .into());
        }
        if self.inversion_price_threshold.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                field: "inversion_price_threshold",
                reason: "must not be negative".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn positive(field: &'static str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: "must be greater than zero".into(),
    }
    .into()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            window_hours: default_window_hours(),
            top_count: default_top_count(),
            min_recent_trades: default_min_recent_trades(),
            activity_window_hours: default_activity_window_hours(),
            min_orderbook_items: default_min_orderbook_items(),
            inversion_price_threshold: default_inversion_price_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CollectorConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = CollectorConfig {
            interval_minutes: 0,
            ..CollectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn interval_is_bounded_to_a_week() {
        let week = CollectorConfig {
            interval_minutes: MAX_INTERVAL_MINUTES,
            ..CollectorConfig::default()
        };
        assert!(week.validate().is_ok());
        assert_eq!(week.interval(), Duration::from_secs(7 * 24 * 3600));

        let huge = CollectorConfig {
            interval_minutes: u64::MAX / 2,
            ..CollectorConfig::default()
        };
        assert!(huge.validate().is_err());
        assert_eq!(huge.interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn order_book_minimum_fits_one_page() {
        let largest = CollectorConfig {
            min_orderbook_items: MAX_ORDERBOOK_ITEMS,
            ..CollectorConfig::default()
        };
        assert!(largest.validate().is_ok());

        let oversized = CollectorConfig {
            min_orderbook_items: MAX_ORDERBOOK_ITEMS + 1,
            ..CollectorConfig::default()
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn activity_window_only_matters_when_filter_enabled() {
        let disabled = CollectorConfig {
            min_recent_trades: 0,
            activity_window_hours: 0,
            ..CollectorConfig::default()
        };
        assert!(disabled.validate().is_ok());

        let enabled = CollectorConfig {
            activity_window_hours: 0,
            ..CollectorConfig::default()
        };
        assert!(enabled.validate().is_err());
    }
}
