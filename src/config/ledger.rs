//! Ledger API connection settings.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Ledger API connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the Horizon API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Trades requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_url() -> String {
    "https://horizon.stellar.org".into()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    200
}

impl LedgerConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if url::Url::parse(&self.api_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: format!("'{}' is not an absolute URL", self.api_url),
            }
            .into());
        }
        if self.page_size == 0 || self.page_size > 200 {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: "must be between 1 and 200".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}
