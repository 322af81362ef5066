//! In-memory [`MarketData`] for engine tests.
//!
//! Static answers (prices, domains, order book depths, per-market trade
//! counts) are fixed with `with_*` builders. The harvested trade list, an
//! injected failure, a delay and a panic switch can be changed at runtime
//! through `&self` so a shared instance can script successive cycles.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;

use super::domain::trades_on;
use crate::domain::{Asset, MarketId, MarketPair, Price, Trade};
use crate::error::Error;
use crate::port::{MarketData, TradeHistory};

/// Scripted market data with call counters.
///
/// Unscripted lookups behave like an empty ledger: no price, no domain, no
/// market trades. Unscripted order books count as deep enough.
#[derive(Default)]
pub struct ScriptedMarketData {
    trades: Mutex<Vec<Trade>>,
    trade_failure: Mutex<Option<String>>,
    trade_delay: Mutex<Option<StdDuration>>,
    panic_on_trades: AtomicBool,
    prices: HashMap<Asset, Price>,
    domains: HashMap<(String, String), String>,
    order_books: HashMap<MarketId, usize>,
    market_trades: HashMap<MarketId, usize>,
    interrupted_markets: HashSet<MarketId>,
    trade_fetches: AtomicUsize,
    price_lookups: AtomicUsize,
    domain_lookups: AtomicUsize,
    liquidity_checks: AtomicUsize,
    activity_checks: AtomicUsize,
}

impl ScriptedMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trades returned by `recent_trades`.
    pub fn with_trades(self, trades: Vec<Trade>) -> Self {
        self.set_trades(trades);
        self
    }

    pub fn with_price(mut self, asset: &Asset, price: Price) -> Self {
        self.prices.insert(asset.clone(), price);
        self
    }

    /// Home domain of a credit asset's issuer.
    pub fn with_domain(mut self, asset: &Asset, domain: &str) -> Self {
        if let Some(issuer) = asset.issuer() {
            self.domains.insert(
                (asset.code().to_string(), issuer.to_string()),
                domain.to_string(),
            );
        }
        self
    }

    /// Combined bid and ask count of `market`'s order book.
    pub fn with_order_book(mut self, market: &MarketPair, depth: usize) -> Self {
        self.order_books.insert(market.id(), depth);
        self
    }

    /// Number of trades `market_trades` reports for `market`.
    pub fn with_market_trades(mut self, market: &MarketPair, count: usize) -> Self {
        self.market_trades.insert(market.id(), count);
        self
    }

    /// Report `market`'s trade history as interrupted.
    pub fn with_interrupted_market(mut self, market: &MarketPair) -> Self {
        self.interrupted_markets.insert(market.id());
        self
    }

    /// Sleep before answering `recent_trades`.
    pub fn with_trade_delay(self, delay: StdDuration) -> Self {
        *self.trade_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn set_trades(&self, trades: Vec<Trade>) {
        *self.trades.lock().unwrap() = trades;
    }

    /// Mark `recent_trades` as interrupted with a transport error, or clear it.
    pub fn set_trade_failure(&self, message: Option<&str>) {
        *self.trade_failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Make `recent_trades` panic.
    pub fn set_panic(&self, panic: bool) {
        self.panic_on_trades.store(panic, Ordering::SeqCst);
    }

    pub fn trade_fetches(&self) -> usize {
        self.trade_fetches.load(Ordering::SeqCst)
    }

    pub fn price_lookups(&self) -> usize {
        self.price_lookups.load(Ordering::SeqCst)
    }

    pub fn domain_lookups(&self) -> usize {
        self.domain_lookups.load(Ordering::SeqCst)
    }

    pub fn liquidity_checks(&self) -> usize {
        self.liquidity_checks.load(Ordering::SeqCst)
    }

    pub fn activity_checks(&self) -> usize {
        self.activity_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketData for ScriptedMarketData {
    async fn recent_trades(&self, _window: Duration) -> TradeHistory {
        self.trade_fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.trade_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on_trades.load(Ordering::SeqCst) {
            panic!("scripted panic while fetching trades");
        }

        let trades = self.trades.lock().unwrap().clone();
        let failure = self.trade_failure.lock().unwrap().clone();
        match failure {
            Some(message) => TradeHistory::interrupted(trades, Error::Transport(message)),
            None => TradeHistory::complete(trades),
        }
    }

    async fn market_trades(
        &self,
        market: &MarketPair,
        _window: Duration,
        limit: Option<usize>,
    ) -> TradeHistory {
        self.activity_checks.fetch_add(1, Ordering::SeqCst);

        let id = market.id();
        let count = self.market_trades.get(&id).copied().unwrap_or(0);
        let count = limit.map_or(count, |limit| count.min(limit));
        let trades = trades_on(market, count);
        if self.interrupted_markets.contains(&id) {
            TradeHistory::interrupted(trades, Error::Transport("scripted interruption".into()))
        } else {
            TradeHistory::complete(trades)
        }
    }

    async fn price_in_reference(&self, asset: &Asset) -> Option<Price> {
        self.price_lookups.fetch_add(1, Ordering::SeqCst);
        if asset.is_native() {
            return Some(Price::ONE);
        }
        self.prices.get(asset).copied()
    }

    async fn issuer_domain(&self, code: &str, issuer: &str) -> Option<String> {
        self.domain_lookups.fetch_add(1, Ordering::SeqCst);
        self.domains
            .get(&(code.to_string(), issuer.to_string()))
            .cloned()
    }

    async fn has_sufficient_liquidity(&self, market: &MarketPair, min_items: u32) -> bool {
        self.liquidity_checks.fetch_add(1, Ordering::SeqCst);
        self.order_books
            .get(&market.id())
            .map_or(true, |&depth| depth >= min_items as usize)
    }
}
