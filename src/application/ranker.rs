//! Top-N market selection.
//!
//! Candidates are taken in descending volume order. Each one must pass the
//! liquidity and activity checks before it counts toward the result; a
//! rejected candidate simply makes room for the next one.

use chrono::Duration;
use tracing::{debug, info, warn};

use super::aggregator::MarketVolumes;
use crate::config::CollectorConfig;
use crate::domain::{Asset, AssetRecord, MarketId, MarketPair, TopExchange, Volume};
use crate::error::Result;
use crate::port::MarketData;

/// Qualification thresholds and result size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRules {
    pub top_count: usize,
    /// Zero disables the liquidity check.
    pub min_orderbook_items: u32,
    /// Zero disables the activity check.
    pub min_recent_trades: usize,
    pub activity_window: Duration,
}

impl From<&CollectorConfig> for RankingRules {
    fn from(config: &CollectorConfig) -> Self {
        Self {
            top_count: config.top_count,
            min_orderbook_items: config.min_orderbook_items,
            min_recent_trades: config.min_recent_trades,
            activity_window: Duration::hours(i64::from(config.activity_window_hours)),
        }
    }
}

/// An accepted market with its aggregated volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMarket {
    pub market: MarketId,
    pub volume: Volume,
    pub exchange: TopExchange,
}

/// Selects the top qualifying markets.
#[derive(Debug, Clone)]
pub struct MarketRanker {
    rules: RankingRules,
}

impl MarketRanker {
    #[must_use]
    pub const fn new(rules: RankingRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &RankingRules {
        &self.rules
    }

    /// Pick up to `top_count` qualifying markets, highest volume first.
    ///
    /// Equal volumes keep first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if a market id does not split back into its assets.
    pub async fn select(
        &self,
        volumes: &MarketVolumes,
        market_data: &dyn MarketData,
    ) -> Result<Vec<RankedMarket>> {
        let mut remaining: Vec<(&MarketId, Volume)> = volumes.iter().collect();
        let mut ranked = Vec::with_capacity(self.rules.top_count.min(remaining.len()));

        while ranked.len() < self.rules.top_count {
            let Some(index) = max_index(&remaining) else {
                break;
            };
            let (market, volume) = remaining.remove(index);
            let pair = market.pair()?;

            if !self.qualifies(market, &pair, market_data).await {
                continue;
            }

            let exchange = expand(&pair, market_data).await;
            debug!(market = %market, volume = %volume, rank = ranked.len() + 1, "Market accepted");
            ranked.push(RankedMarket {
                market: market.clone(),
                volume,
                exchange,
            });
        }

        info!(
            candidates = volumes.len(),
            selected = ranked.len(),
            "Ranked markets"
        );
        Ok(ranked)
    }

    async fn qualifies(
        &self,
        market: &MarketId,
        pair: &MarketPair,
        market_data: &dyn MarketData,
    ) -> bool {
        let min_items = self.rules.min_orderbook_items;
        if min_items > 0 && !market_data.has_sufficient_liquidity(pair, min_items).await {
            info!(market = %market, min_items, "Market disqualified: thin order book");
            return false;
        }

        let min_trades = self.rules.min_recent_trades;
        if min_trades == 0 {
            return true;
        }

        let history = market_data
            .market_trades(pair, self.rules.activity_window, Some(min_trades))
            .await;
        if history.len() >= min_trades {
            return true;
        }

        match history.interrupted {
            Some(error) => {
                warn!(
                    market = %market,
                    trades = history.trades.len(),
                    error = %error.chain(),
                    "Activity check interrupted, keeping market"
                );
                true
            }
            None => {
                info!(
                    market = %market,
                    trades = history.trades.len(),
                    min_trades,
                    "Market disqualified: too few recent trades"
                );
                false
            }
        }
    }
}

/// Position of the largest volume; the earliest entry wins ties.
fn max_index(entries: &[(&MarketId, Volume)]) -> Option<usize> {
    let mut best: Option<(usize, Volume)> = None;
    for (i, (_, volume)) in entries.iter().enumerate() {
        if best.map_or(true, |(_, top)| *volume > top) {
            best = Some((i, *volume));
        }
    }
    best.map(|(i, _)| i)
}

async fn expand(pair: &MarketPair, market_data: &dyn MarketData) -> TopExchange {
    TopExchange {
        base_asset: asset_record(&pair.base, market_data).await,
        counter_asset: asset_record(&pair.counter, market_data).await,
    }
}

async fn asset_record(asset: &Asset, market_data: &dyn MarketData) -> AssetRecord {
    let domain = match asset.issuer() {
        Some(issuer) => market_data.issuer_domain(asset.code(), issuer).await,
        None => None,
    };
    AssetRecord::new(asset, domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{credit, native};
    use crate::testkit::market_data::ScriptedMarketData;
    use rust_decimal_macros::dec;

    fn rules(top_count: usize) -> RankingRules {
        RankingRules {
            top_count,
            min_orderbook_items: 0,
            min_recent_trades: 0,
            activity_window: Duration::hours(24),
        }
    }

    fn volumes(entries: &[(&Asset, Volume)]) -> MarketVolumes {
        let mut volumes = MarketVolumes::new();
        for (asset, volume) in entries {
            let market = MarketPair::new((*asset).clone(), native()).id();
            volumes.add(&market, *volume);
        }
        volumes
    }

    #[test]
    fn max_index_prefers_first_seen_on_ties() {
        let a = MarketPair::new(credit("AAA"), native()).id();
        let b = MarketPair::new(credit("BBB"), native()).id();
        let entries = vec![(&a, dec!(5)), (&b, dec!(5))];

        assert_eq!(max_index(&entries), Some(0));
        assert_eq!(max_index(&[]), None);
    }

    #[tokio::test]
    async fn results_are_descending_and_bounded() {
        let (a, b, c) = (credit("AAA"), credit("BBB"), credit("CCC"));
        let volumes = volumes(&[(&a, dec!(1)), (&b, dec!(3)), (&c, dec!(2))]);

        let ranked = MarketRanker::new(rules(2))
            .select(&volumes, &ScriptedMarketData::new())
            .await
            .unwrap();

        let codes: Vec<_> = ranked
            .iter()
            .map(|r| r.exchange.base_asset.code.as_str())
            .collect();
        assert_eq!(codes, vec!["BBB", "CCC"]);
        assert_eq!(ranked[0].volume, dec!(3));
    }

    #[tokio::test]
    async fn issuer_domains_are_attached() {
        let a = credit("AAA");
        let market_data = ScriptedMarketData::new().with_domain(&a, "anchor.example");

        let ranked = MarketRanker::new(rules(1))
            .select(&volumes(&[(&a, dec!(1))]), &market_data)
            .await
            .unwrap();

        let base = &ranked[0].exchange.base_asset;
        let issuer = base.issuer.as_ref().unwrap();
        assert_eq!(issuer.domain.as_deref(), Some("anchor.example"));
        assert!(ranked[0].exchange.counter_asset.issuer.is_none());
        assert_eq!(market_data.domain_lookups(), 1);
    }

    #[tokio::test]
    async fn interrupted_activity_check_keeps_market() {
        let a = credit("AAA");
        let pair = MarketPair::new(a.clone(), native());
        let market_data = ScriptedMarketData::new()
            .with_market_trades(&pair, 2)
            .with_interrupted_market(&pair);
        let rules = RankingRules {
            min_recent_trades: 10,
            ..rules(1)
        };

        let ranked = MarketRanker::new(rules)
            .select(&volumes(&[(&a, dec!(1))]), &market_data)
            .await
            .unwrap();

        assert_eq!(ranked.len(), 1);
    }

    #[tokio::test]
    async fn thin_book_makes_room_for_next_candidate() {
        let (a, b, c) = (credit("AAA"), credit("BBB"), credit("CCC"));
        let market_data = ScriptedMarketData::new()
            .with_order_book(&MarketPair::new(a.clone(), native()), 2)
            .with_order_book(&MarketPair::new(b.clone(), native()), 20)
            .with_order_book(&MarketPair::new(c.clone(), native()), 20);
        let rules = RankingRules {
            min_orderbook_items: 10,
            ..rules(2)
        };

        let ranked = MarketRanker::new(rules)
            .select(
                &volumes(&[(&a, dec!(9)), (&b, dec!(5)), (&c, dec!(1))]),
                &market_data,
            )
            .await
            .unwrap();

        let codes: Vec<_> = ranked
            .iter()
            .map(|r| r.exchange.base_asset.code.as_str())
            .collect();
        assert_eq!(codes, vec!["BBB", "CCC"]);
        assert_eq!(market_data.liquidity_checks(), 3);
    }
}
