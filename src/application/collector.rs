//! Scheduled collection cycles.
//!
//! A cycle fetches the trade window, aggregates it, ranks the markets and
//! publishes a snapshot. Cycles run on a fixed interval with one immediate
//! run at start. At most one cycle runs at a time; a tick that arrives while
//! a cycle is still running is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::aggregator::VolumeAggregator;
use super::ranker::{MarketRanker, RankingRules};
use super::snapshot::SnapshotStore;
use crate::config::CollectorConfig;
use crate::domain::Snapshot;
use crate::error::{Error, Result};
use crate::port::MarketData;

/// What a call to [`Collector::run_cycle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A snapshot with `markets` entries was published.
    Published { markets: usize },
    /// Another cycle was already running.
    Skipped,
    /// The cycle failed; the previous snapshot stays in place.
    Failed,
}

/// Holds the single-flight flag for the duration of a cycle.
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { running })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Handle to the running collector ticker.
///
/// Dropping the handle also stops the ticker.
pub struct CollectorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CollectorHandle {
    /// Stop scheduling new cycles and wait for the ticker to exit.
    ///
    /// A cycle already in flight is not cancelled.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(error) = self.task.await {
            warn!(error = %error, "Collector ticker ended abnormally");
        }
    }
}

/// Drives collection cycles and owns the single-flight guard.
pub struct Collector {
    market_data: Arc<dyn MarketData>,
    store: SnapshotStore,
    aggregator: VolumeAggregator,
    ranker: MarketRanker,
    trade_window: Duration,
    interval: StdDuration,
    running: AtomicBool,
}

impl Collector {
    pub fn new(
        market_data: Arc<dyn MarketData>,
        store: SnapshotStore,
        config: &CollectorConfig,
    ) -> Self {
        Self {
            market_data,
            store,
            aggregator: VolumeAggregator::new(config.inversion_price_threshold),
            ranker: MarketRanker::new(RankingRules::from(config)),
            trade_window: Duration::hours(i64::from(config.window_hours)),
            interval: config.interval(),
            running: AtomicBool::new(false),
        }
    }

    /// Override the tick interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: StdDuration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn interval(&self) -> StdDuration {
        self.interval
    }

    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Whether a cycle currently holds the guard.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one cycle unless another is in progress.
    ///
    /// Errors are logged here and never escape; the guard is released on
    /// every exit path, including unwinding.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            warn!("Collection already running, skipping tick");
            return CycleOutcome::Skipped;
        };

        info!("========== Collection cycle started ==========");
        let outcome = match self.collect().await {
            Ok(snapshot) => {
                info!(
                    markets = snapshot.len(),
                    timestamp = %snapshot.timestamp,
                    "Published snapshot"
                );
                CycleOutcome::Published {
                    markets: snapshot.len(),
                }
            }
            Err(error) => {
                error!(error = %error.chain(), "Collection cycle failed");
                CycleOutcome::Failed
            }
        };
        info!("========== Collection cycle finished ==========");
        outcome
    }

    async fn collect(&self) -> Result<Arc<Snapshot>> {
        let market_data = self.market_data.as_ref();

        let history = market_data.recent_trades(self.trade_window).await;
        if let Some(error) = history.interrupted {
            if history.trades.is_empty() {
                return Err(Error::TradeHistory(Box::new(error)));
            }
            warn!(
                trades = history.trades.len(),
                error = %error.chain(),
                "Trade history incomplete, continuing with partial data"
            );
        }
        info!(trades = history.trades.len(), "Fetched trade history");

        let volumes = self.aggregator.aggregate(&history.trades, market_data).await;
        let ranked = self.ranker.select(&volumes, market_data).await?;

        let snapshot = Snapshot::new(
            Utc::now(),
            ranked.into_iter().map(|market| market.exchange).collect(),
        );
        Ok(self.store.publish(snapshot))
    }

    /// Start the ticker. The first cycle runs immediately.
    pub fn start(self: Arc<Self>) -> CollectorHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Collector shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.spawn_cycle();
                        info!(sleep_secs = interval.as_secs(), "Next collection scheduled");
                    }
                }
            }
        });

        CollectorHandle { shutdown_tx, task }
    }

    fn spawn_cycle(self: &Arc<Self>) {
        let collector = Arc::clone(self);
        tokio::spawn(async move {
            let cycle = tokio::spawn(async move { collector.run_cycle().await });
            match cycle.await {
                Ok(_) => {}
                Err(error) if error.is_panic() => {
                    error!(error = %error, "Collection cycle panicked");
                }
                Err(error) => {
                    warn!(error = %error, "Collection cycle cancelled");
                }
            }
        });
    }
}
