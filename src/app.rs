//! Application wiring.
//!
//! Builds the ledger client from configuration, starts the collector and
//! exposes the read side: the latest snapshot and the in-memory log dump.

use std::sync::Arc;

use tracing::info;

use crate::adapter::horizon::HorizonClient;
use crate::adapter::log_buffer::LogBuffer;
use crate::application::{Collector, CollectorHandle, SnapshotStore};
use crate::config::{CollectorConfig, Config};
use crate::error::Result;
use crate::port::MarketData;

/// A running collector with its published state.
pub struct App {
    collector: Arc<Collector>,
    store: SnapshotStore,
    logs: LogBuffer,
    handle: CollectorHandle,
}

impl App {
    /// Connect to the configured ledger and start collecting.
    ///
    /// Prices are cached for one collection interval. Must be called from
    /// within a Tokio runtime.
    pub fn start(config: &Config, logs: LogBuffer) -> Result<Self> {
        let price_ttl = config.collector.interval();
        let client = HorizonClient::from_config(&config.ledger, price_ttl)?;
        info!(
            api_url = client.base_url(),
            interval_minutes = config.collector.interval_minutes,
            top_count = config.collector.top_count,
            "Ledger client ready"
        );
        Ok(Self::with_market_data(
            Arc::new(client),
            &config.collector,
            logs,
        ))
    }

    /// Start collecting from an arbitrary market data source.
    pub fn with_market_data(
        market_data: Arc<dyn MarketData>,
        config: &CollectorConfig,
        logs: LogBuffer,
    ) -> Self {
        let store = SnapshotStore::new();
        let collector = Arc::new(Collector::new(market_data, store.clone(), config));
        let handle = Arc::clone(&collector).start();
        Self {
            collector,
            store,
            logs,
            handle,
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.store
    }

    #[must_use]
    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    #[must_use]
    pub fn collector(&self) -> &Arc<Collector> {
        &self.collector
    }

    /// Stop the ticker. A cycle in flight runs to completion in the background.
    pub async fn shutdown(self) {
        self.handle.shutdown().await;
    }
}
