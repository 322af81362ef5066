//! Horizon REST API client.
//!
//! Implements [`MarketData`] on top of a [`Transport`], with a TTL cache for
//! native prices and a lifetime cache for issuer domains.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::cache::TtlCache;
use super::dto::{AssetRecord, OrderBook, Page, TradeRecord};
use super::query::{Endpoints, TRADES_PAGE_SIZE};
use super::transport::{ReqwestTransport, Transport};
use crate::config::LedgerConfig;
use crate::domain::{Asset, MarketPair, Price, Trade};
use crate::error::Result;
use crate::port::{MarketData, TradeHistory};

/// Prices older than this are treated as unknown.
pub const PRICE_STALENESS_DAYS: i64 = 3;

/// HTTP client for the Horizon ledger API.
pub struct HorizonClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    page_size: u32,
    price_cache: TtlCache<String, Price>,
    domain_cache: TtlCache<String, Option<String>>,
}

/// One decoded page of trades.
struct TradePage {
    trades: Vec<Trade>,
    next_cursor: Option<String>,
    record_count: usize,
}

impl HorizonClient {
    /// Create a client over `transport`; prices are cached for `price_ttl`.
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: &str,
        price_ttl: StdDuration,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            endpoints: Endpoints::new(base_url)?,
            page_size: TRADES_PAGE_SIZE,
            price_cache: TtlCache::with_ttl(price_ttl),
            domain_cache: TtlCache::unbounded(),
        })
    }

    /// Create a reqwest-backed client from the ledger configuration.
    pub fn from_config(config: &LedgerConfig, price_ttl: StdDuration) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::new(Arc::new(transport), &config.api_url, price_ttl)?
            .with_page_size(config.page_size))
    }

    /// Override the number of trades requested per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoints.base()
    }

    /// Number of prices currently cached (including expired, not yet evicted).
    #[must_use]
    pub fn cached_prices(&self) -> usize {
        self.price_cache.len()
    }

    /// Number of issuer domains currently cached.
    #[must_use]
    pub fn cached_domains(&self) -> usize {
        self.domain_cache.len()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let body = self.transport.get(url.as_str()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_trade_page(&self, url: &Url) -> Result<TradePage> {
        let records = self.get_json::<Page<TradeRecord>>(url).await?.into_records();
        let record_count = records.len();
        let next_cursor = records.last().map(|record| record.paging_token.clone());

        let trades = records
            .into_iter()
            .filter_map(|record| {
                let token = record.paging_token.clone();
                match Trade::try_from(record) {
                    Ok(trade) => Some(trade),
                    Err(e) => {
                        warn!(paging_token = %token, error = %e, "Skipping malformed trade record");
                        None
                    }
                }
            })
            .collect();

        Ok(TradePage {
            trades,
            next_cursor,
            record_count,
        })
    }

    /// Follow trade pages newest-first until the window start is crossed or
    /// `limit` trades are gathered.
    async fn paginate(
        &self,
        market: Option<&MarketPair>,
        window: Duration,
        limit: Option<usize>,
    ) -> TradeHistory {
        let cutoff = Utc::now() - window;
        let mut trades = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = match self.next_page(market, cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        gathered = trades.len(),
                        error = %e,
                        "Trade pagination interrupted"
                    );
                    return TradeHistory::interrupted(trades, e);
                }
            };

            let oldest = page.trades.last().map(Trade::close_time);
            let before = trades.len();
            trades.extend(
                page.trades
                    .into_iter()
                    .filter(|trade| trade.close_time() >= cutoff),
            );
            debug!(
                parsed = trades.len() - before,
                total = trades.len(),
                oldest = ?oldest,
                "Parsed trade page"
            );

            if reached_cutoff(oldest, cutoff) || page.record_count < self.page_size as usize {
                break;
            }
            if limit.is_some_and(|limit| trades.len() >= limit) {
                debug!(total = trades.len(), "Trade limit reached");
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        TradeHistory::complete(trades)
    }

    async fn next_page(
        &self,
        market: Option<&MarketPair>,
        cursor: Option<&str>,
    ) -> Result<TradePage> {
        let url = self.endpoints.trades(market, self.page_size, cursor)?;
        self.fetch_trade_page(&url).await
    }

    async fn fetch_latest_native_price(&self, asset: &Asset) -> Result<Option<Price>> {
        let url = self.endpoints.latest_native_trade(asset)?;
        let page = self.fetch_trade_page(&url).await?;

        let Some(trade) = page.trades.into_iter().next() else {
            return Ok(None);
        };
        if trade.close_time() < Utc::now() - Duration::days(PRICE_STALENESS_DAYS) {
            debug!(asset = %asset, last_trade = %trade.close_time(), "No recent trade against native");
            return Ok(None);
        }
        Ok(Some(trade.base_price()))
    }

    async fn fetch_issuer_domain(&self, code: &str, issuer: &str) -> Result<Option<String>> {
        let url = self.endpoints.assets(code, issuer)?;
        let records = self.get_json::<Page<AssetRecord>>(&url).await?.into_records();

        Ok(records
            .first()
            .and_then(AssetRecord::toml_href)
            .and_then(host_of))
    }

    async fn fetch_order_book_depth(&self, market: &MarketPair, min_items: u32) -> Result<usize> {
        let url = self.endpoints.order_book(market, min_items)?;
        let book: OrderBook = self.get_json(&url).await?;
        Ok(book.depth())
    }
}

#[async_trait]
impl MarketData for HorizonClient {
    async fn recent_trades(&self, window: Duration) -> TradeHistory {
        // Evict prices left over from earlier cycles.
        self.price_cache.clear_expired();
        let history = self.paginate(None, window, None).await;
        info!(
            trades = history.len(),
            complete = history.is_complete(),
            "Fetched recent trades"
        );
        history
    }

    async fn market_trades(
        &self,
        market: &MarketPair,
        window: Duration,
        limit: Option<usize>,
    ) -> TradeHistory {
        self.paginate(Some(market), window, limit).await
    }

    async fn price_in_reference(&self, asset: &Asset) -> Option<Price> {
        if asset.is_native() {
            return Some(Price::ONE);
        }

        let key = asset.id();
        if let Some(price) = self.price_cache.get(&key) {
            return Some(price);
        }

        match self.fetch_latest_native_price(asset).await {
            Ok(Some(price)) => {
                self.price_cache.put(key, price);
                info!(asset = %asset, price = %price.round_dp(8), "Cached price in XLM");
                Some(price)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(asset = %asset, error = %e, "Failed to fetch asset price");
                None
            }
        }
    }

    async fn issuer_domain(&self, code: &str, issuer: &str) -> Option<String> {
        let key = format!("{code}-{issuer}");
        if let Some(domain) = self.domain_cache.get(&key) {
            return domain;
        }

        match self.fetch_issuer_domain(code, issuer).await {
            Ok(domain) => {
                info!(asset = %key, domain = ?domain, "Resolved issuer domain");
                self.domain_cache.put(key, domain.clone());
                domain
            }
            Err(e) => {
                warn!(asset = %key, error = %e, "Failed to fetch issuer's domain");
                None
            }
        }
    }

    async fn has_sufficient_liquidity(&self, market: &MarketPair, min_items: u32) -> bool {
        match self.fetch_order_book_depth(market, min_items).await {
            Ok(depth) => depth >= min_items as usize,
            Err(e) => {
                warn!(market = %market, error = %e, "Failed to get order book, assuming sufficient");
                true
            }
        }
    }
}

fn reached_cutoff(oldest: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    oldest.is_some_and(|oldest| oldest < cutoff)
}

/// Host portion of a metadata-file URL.
fn host_of(href: &str) -> Option<String> {
    Url::parse(href.trim())
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}
