//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Every section has defaults, so
//! an empty file is a valid configuration. The ledger URL can be overridden
//! with `PAIRWATCH_API_URL`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod collector;
mod ledger;
mod logging;

pub use collector::{CollectorConfig, MAX_INTERVAL_MINUTES, MAX_ORDERBOOK_ITEMS};
pub use ledger::LedgerConfig;
pub use logging::LoggingConfig;

/// Environment variable that overrides `ledger.api_url`.
pub const API_URL_ENV: &str = "PAIRWATCH_API_URL";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Read, parse, apply environment overrides, and validate a config file.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config = Self::parse(&content)?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.ledger.api_url = url;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Parse TOML text without environment overrides or validation.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()?;
        self.collector.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.ledger.api_url, "https://horizon.stellar.org");
        assert_eq!(config.collector.interval_minutes, 5);
        assert_eq!(config.collector.window_hours, 24);
        assert_eq!(config.collector.top_count, 12);
        assert_eq!(config.collector.inversion_price_threshold, dec!(0.01));
        assert_eq!(config.logging.buffer_capacity, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [ledger]
            api_url = "https://horizon-testnet.stellar.org"

            [collector]
            interval_minutes = 10
            top_count = 5
            min_orderbook_items = 20
            inversion_price_threshold = "0.001"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.api_url, "https://horizon-testnet.stellar.org");
        assert_eq!(config.collector.interval_minutes, 10);
        assert_eq!(config.collector.top_count, 5);
        assert_eq!(config.collector.min_orderbook_items, 20);
        assert_eq!(config.collector.inversion_price_threshold, dec!(0.001));
        assert_eq!(config.collector.window_hours, 24);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn zero_top_count_fails_validation() {
        let config = Config::parse("[collector]\ntop_count = 0").unwrap();
        let err = config.validate().unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "top_count",
                ..
            })
        ));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[collector]\nwindow_hours = 6").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.collector.window_hours, 6);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/pairwatch.toml").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
    }

    #[test]
    fn load_reports_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[collector\ntop_count = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
