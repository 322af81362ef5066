//! Market data port consumed by the aggregation engine.
//!
//! The aggregator and ranker only see this trait, so the concrete ledger
//! client (and its caches) can be swapped for scripted data in tests.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::{Asset, MarketPair, Price, Trade};
use crate::error::Error;

/// Trades gathered by a paginated fetch.
///
/// A failure part-way through paging does not discard what was already
/// read: `trades` holds every in-window trade seen before the failure and
/// `interrupted` carries the failure itself.
#[derive(Debug, Default)]
pub struct TradeHistory {
    pub trades: Vec<Trade>,
    pub interrupted: Option<Error>,
}

impl TradeHistory {
    /// A history that was read to the end of its window.
    #[must_use]
    pub const fn complete(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            interrupted: None,
        }
    }

    /// A history cut short by `error` after gathering `trades`.
    #[must_use]
    pub const fn interrupted(trades: Vec<Trade>, error: Error) -> Self {
        Self {
            trades,
            interrupted: Some(error),
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// Read access to the remote ledger.
///
/// Implementations recover from transient failures locally: lookups return
/// `None` and the liquidity check fails open.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// All trades closed within `window`, newest first.
    async fn recent_trades(&self, window: Duration) -> TradeHistory;

    /// Trades of a single market closed within `window`, newest first.
    ///
    /// With `limit`, paging may stop as soon as that many trades are
    /// gathered; the history still counts as complete.
    async fn market_trades(
        &self,
        market: &MarketPair,
        window: Duration,
        limit: Option<usize>,
    ) -> TradeHistory;

    /// Last traded price of `asset` in the native reference currency.
    async fn price_in_reference(&self, asset: &Asset) -> Option<Price>;

    /// Home domain published by the issuer of `code`.
    async fn issuer_domain(&self, code: &str, issuer: &str) -> Option<String>;

    /// Whether the order book holds at least `min_items` bids and asks combined.
    async fn has_sufficient_liquidity(&self, market: &MarketPair, min_items: u32) -> bool;
}
