//! URL construction for Horizon endpoints.

use url::Url;

use crate::domain::{Asset, MarketPair};
use crate::error::Result;

/// Number of records requested per page of trades.
pub const TRADES_PAGE_SIZE: u32 = 200;

/// Endpoint builder rooted at the Horizon base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Validate `base_url` and strip any trailing slash.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/').to_string();
        Url::parse(&base)?;
        Ok(Self { base })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// One page of trades, newest first, optionally restricted to a market.
    pub fn trades(
        &self,
        market: Option<&MarketPair>,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Url> {
        let mut url = self.endpoint("trades")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(market) = market {
                push_asset(&mut query, "base_asset", &market.base);
                push_asset(&mut query, "counter_asset", &market.counter);
            }
            query
                .append_pair("order", "desc")
                .append_pair("limit", &limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }
        Ok(url)
    }

    /// Most recent trade of `asset` against the native currency.
    pub fn latest_native_trade(&self, asset: &Asset) -> Result<Url> {
        self.trades(Some(&MarketPair::new(asset.clone(), Asset::native())), 1, None)
    }

    /// Asset metadata filtered by code and issuer.
    pub fn assets(&self, code: &str, issuer: &str) -> Result<Url> {
        let mut url = self.endpoint("assets")?;
        url.query_pairs_mut()
            .append_pair("asset_code", code)
            .append_pair("asset_issuer", issuer);
        Ok(url)
    }

    /// Order book of `market` with roughly `min_items / 2` entries per side,
    /// capped at one full page.
    pub fn order_book(&self, market: &MarketPair, min_items: u32) -> Result<Url> {
        let mut url = self.endpoint("order_book")?;
        {
            let mut query = url.query_pairs_mut();
            push_asset(&mut query, "selling_asset", &market.base);
            push_asset(&mut query, "buying_asset", &market.counter);
            let per_side = (min_items / 2).saturating_add(1).min(TRADES_PAGE_SIZE);
            query.append_pair("limit", &per_side.to_string());
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base, path))?)
    }
}

fn push_asset(
    query: &mut url::form_urlencoded::Serializer<'_, url::UrlQuery<'_>>,
    prefix: &str,
    asset: &Asset,
) {
    query.append_pair(&format!("{prefix}_type"), asset.asset_type().as_str());
    if let Some(issuer) = asset.issuer() {
        query
            .append_pair(&format!("{prefix}_code"), asset.code())
            .append_pair(&format!("{prefix}_issuer"), issuer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "GBSTRUSD7IRX73RQZBL3RQUH6KS3O4NYFY3QCALDLZD77XMZOPWAVTUK";

    fn endpoints() -> Endpoints {
        Endpoints::new("https://horizon.example/").unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(endpoints().base(), "https://horizon.example");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(Endpoints::new("not a url").is_err());
    }

    #[test]
    fn trades_page_carries_order_limit_and_cursor() {
        let url = endpoints()
            .trades(None, TRADES_PAGE_SIZE, Some("123-4"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://horizon.example/trades?order=desc&limit=200&cursor=123-4"
        );
    }

    #[test]
    fn market_filter_describes_both_assets() {
        let market = MarketPair::new(Asset::credit("USD", ISSUER), Asset::native());
        let url = endpoints().trades(Some(&market), 200, None).unwrap();
        let query = url.query().unwrap();

        assert!(query.contains("base_asset_type=credit_alphanum4"));
        assert!(query.contains("base_asset_code=USD"));
        assert!(query.contains(&format!("base_asset_issuer={ISSUER}")));
        assert!(query.contains("counter_asset_type=native"));
        assert!(!query.contains("counter_asset_code"));
    }

    #[test]
    fn latest_native_trade_requests_single_record() {
        let url = endpoints()
            .latest_native_trade(&Asset::credit("USD", ISSUER))
            .unwrap();
        let query = url.query().unwrap();

        assert!(query.contains("counter_asset_type=native"));
        assert!(query.ends_with("order=desc&limit=1"));
    }

    #[test]
    fn order_book_limit_is_half_of_minimum_plus_one() {
        let market = MarketPair::new(Asset::credit("MOBIUSCOIN", ISSUER), Asset::native());
        let url = endpoints().order_book(&market, 10).unwrap();
        let query = url.query().unwrap();

        assert!(query.contains("selling_asset_type=credit_alphanum12"));
        assert!(query.contains("buying_asset_type=native"));
        assert!(query.ends_with("limit=6"));
    }

    #[test]
    fn order_book_limit_never_exceeds_page_cap() {
        let market = MarketPair::new(Asset::credit("USD", ISSUER), Asset::native());

        let largest = endpoints().order_book(&market, 398).unwrap();
        assert!(largest.query().unwrap().ends_with("limit=200"));

        let oversized = endpoints().order_book(&market, 1000).unwrap();
        assert!(oversized.query().unwrap().ends_with("limit=200"));
    }

    #[test]
    fn assets_query_filters_by_code_and_issuer() {
        let url = endpoints().assets("USD", ISSUER).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://horizon.example/assets?asset_code=USD&asset_issuer={ISSUER}")
        );
    }
}
