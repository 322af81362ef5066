//! Volume aggregation: trades to per-market native volume.
//!
//! Every unordered asset pair accumulates under exactly one market id.
//! The orientation is decided on first sight and only ever changes through
//! an explicit migration of the accumulated volume.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{MarketId, Price, Trade, Volume};
use crate::port::MarketData;

/// Trades between progress log lines.
const PROGRESS_EVERY: usize = 1000;

/// Accumulated volume per canonical market, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketVolumes {
    entries: Vec<(MarketId, Volume)>,
    index: HashMap<MarketId, usize>,
}

impl MarketVolumes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, market: &MarketId) -> bool {
        self.index.contains_key(market)
    }

    #[must_use]
    pub fn get(&self, market: &MarketId) -> Option<Volume> {
        self.index.get(market).map(|&i| self.entries[i].1)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&MarketId, Volume)> {
        self.entries.iter().map(|(market, volume)| (market, *volume))
    }

    /// Sum of all accumulators.
    #[must_use]
    pub fn total(&self) -> Volume {
        self.entries.iter().map(|(_, volume)| *volume).sum()
    }

    /// Make sure `market` has an accumulator, starting at zero.
    pub fn ensure(&mut self, market: &MarketId) {
        if !self.index.contains_key(market) {
            self.index.insert(market.clone(), self.entries.len());
            self.entries.push((market.clone(), Volume::ZERO));
        }
    }

    /// Add `volume` to `market`, creating the accumulator if needed.
    /// Negative amounts are ignored so no accumulator can go below zero.
    pub fn add(&mut self, market: &MarketId, volume: Volume) {
        self.ensure(market);
        if volume.is_sign_negative() {
            return;
        }
        let i = self.index[market];
        self.entries[i].1 += volume;
    }

    /// Move the accumulator of `from` to `to`, merging if `to` already exists.
    pub fn migrate(&mut self, from: &MarketId, to: &MarketId) {
        let Some(i) = self.index.remove(from) else {
            return;
        };

        if let Some(&j) = self.index.get(to) {
            let volume = self.entries[i].1;
            self.entries[j].1 += volume;
            self.entries.remove(i);
            for position in self.index.values_mut() {
                if *position > i {
                    *position -= 1;
                }
            }
        } else {
            self.entries[i].0 = to.clone();
            self.index.insert(to.clone(), i);
        }
    }
}

/// Folds trades into [`MarketVolumes`], pricing non-native legs on demand.
#[derive(Debug, Clone)]
pub struct VolumeAggregator {
    inversion_threshold: Price,
}

impl VolumeAggregator {
    /// `inversion_threshold`: base prices below this flip a market between
    /// two issued assets to its inverse orientation.
    #[must_use]
    pub const fn new(inversion_threshold: Price) -> Self {
        Self {
            inversion_threshold,
        }
    }

    /// Aggregate `trades` in order, resolving prices through `market_data`.
    pub async fn aggregate(&self, trades: &[Trade], market_data: &dyn MarketData) -> MarketVolumes {
        let mut volumes = MarketVolumes::new();
        let mut unpriced = 0usize;

        for (processed, trade) in trades.iter().enumerate() {
            if processed > 0 && processed % PROGRESS_EVERY == 0 {
                info!(processed, markets = volumes.len(), "Processed volume of another 1000 trades");
            }

            let market = self.canonical_market(&mut volumes, trade);
            match trade_volume(trade, market_data).await {
                Some(volume) if volume.is_sign_negative() => {
                    warn!(market = %market, volume = %volume, "Ignoring negative trade volume");
                }
                Some(volume) => volumes.add(&market, volume),
                None => {
                    unpriced += 1;
                    debug!(market = %market, "No native price for either leg");
                }
            }
        }

        info!(
            trades = trades.len(),
            markets = volumes.len(),
            unpriced,
            "Aggregated market volumes"
        );
        volumes
    }

    /// Pick the market id the trade accumulates under, creating it if new.
    fn canonical_market(&self, volumes: &mut MarketVolumes, trade: &Trade) -> MarketId {
        let pair = trade.pair();
        let forward = pair.id();
        let inverse = pair.inverse().id();

        let market = if volumes.contains(&inverse) {
            inverse
        } else if !pair.involves_native() && trade.base_price() < self.inversion_threshold {
            // Quote the cheap asset on the counter side.
            volumes.migrate(&forward, &inverse);
            inverse
        } else {
            forward
        };

        volumes.ensure(&market);
        market
    }
}

/// Native volume of a single trade, if any leg can be priced.
async fn trade_volume(trade: &Trade, market_data: &dyn MarketData) -> Option<Volume> {
    if let Some(volume) = trade.native_volume() {
        return Some(volume);
    }
    if let Some(price) = market_data.price_in_reference(trade.base()).await {
        return Some(price * trade.base_amount());
    }
    market_data
        .price_in_reference(trade.counter())
        .await
        .map(|price| price * trade.counter_amount())
}
