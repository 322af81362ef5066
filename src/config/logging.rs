//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapter::log_buffer::LogBuffer;
use crate::error::{ConfigError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
    /// Lines kept in memory for the log dump.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

const fn default_buffer_capacity() -> usize {
    1000
}

impl LoggingConfig {
    /// Initialize the tracing subscriber, mirroring every event into `buffer`.
    pub fn init(&self, buffer: &LogBuffer) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        let registry = tracing_subscriber::registry()
            .with(filter)
            .with(buffer.layer());

        match self.format.as_str() {
            "json" => {
                registry.with(fmt::layer().json()).init();
            }
            _ => {
                registry.with(fmt::layer()).init();
            }
        }
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        if !matches!(self.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.format),
            }
            .into());
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "buffer_capacity",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            buffer_capacity: default_buffer_capacity(),
        }
    }
}
