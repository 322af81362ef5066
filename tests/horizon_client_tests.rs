use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use pairwatch::adapter::horizon::HorizonClient;
use pairwatch::domain::Price;
use pairwatch::error::Error;
use pairwatch::port::MarketData;
use pairwatch::testkit::domain::{credit, native, pair};
use pairwatch::testkit::horizon::{asset_page, order_book, page, trade_record};
use pairwatch::testkit::transport::ScriptedTransport;

const BASE_URL: &str = "https://horizon.test";

fn client(transport: &Arc<ScriptedTransport>, price_ttl: StdDuration) -> HorizonClient {
    HorizonClient::new(transport.clone(), BASE_URL, price_ttl).unwrap()
}

/// Records `from..to` of a USD/XLM trade feed, newest first. Records from
/// index `stale_from` on closed before the 24 hour window.
fn feed_page(from: usize, to: usize, stale_from: usize) -> String {
    let now = Utc::now();
    let usd = credit("USD");
    let records = (from..to)
        .map(|i| {
            let close_time = if i < stale_from {
                now - Duration::minutes(i as i64 * 2)
            } else {
                now - Duration::hours(25) - Duration::seconds(i as i64)
            };
            trade_record(
                &format!("p{i}"),
                close_time,
                &usd,
                &native(),
                dec!(1),
                dec!(10),
            )
        })
        .collect();
    page(records)
}

#[tokio::test]
async fn pagination_stops_at_window_start() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route("cursor=p199", feed_page(200, 400, 500))
            .route("cursor=p399", feed_page(400, 600, 500))
            .route("/trades?", feed_page(0, 200, 500)),
    );

    let history = client(&transport, StdDuration::from_secs(60))
        .recent_trades(Duration::hours(24))
        .await;

    assert!(history.is_complete());
    assert_eq!(history.len(), 500);
    assert_eq!(transport.count_matching("/trades?"), 3);
    assert_eq!(history.trades[0].paging_token(), "p0");
    assert_eq!(history.trades[499].paging_token(), "p499");
    assert!(transport.requests()[0].contains("order=desc&limit=200"));
}

#[tokio::test]
async fn short_page_ends_pagination() {
    let transport =
        Arc::new(ScriptedTransport::new().route("/trades?", feed_page(0, 50, 500)));

    let history = client(&transport, StdDuration::from_secs(60))
        .recent_trades(Duration::hours(24))
        .await;

    assert_eq!(history.len(), 50);
    assert_eq!(transport.count_matching("/trades?"), 1);
}

#[tokio::test]
async fn failed_page_keeps_gathered_trades() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .status("cursor=p199", 503)
            .route("/trades?", feed_page(0, 200, 500)),
    );

    let history = client(&transport, StdDuration::from_secs(60))
        .recent_trades(Duration::hours(24))
        .await;

    assert_eq!(history.len(), 200);
    assert!(matches!(
        history.interrupted,
        Some(Error::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn malformed_records_are_skipped() {
    let usd = credit("USD");
    let mut broken = trade_record("bad", Utc::now(), &usd, &native(), dec!(1), dec!(2));
    broken["base_amount"] = "not a number".into();
    let body = page(vec![
        trade_record("good", Utc::now(), &usd, &native(), dec!(1), dec!(2)),
        broken,
    ]);
    let transport = Arc::new(ScriptedTransport::new().route("/trades?", body));

    let history = client(&transport, StdDuration::from_secs(60))
        .recent_trades(Duration::hours(24))
        .await;

    assert!(history.is_complete());
    assert_eq!(history.len(), 1);
    assert_eq!(history.trades[0].paging_token(), "good");
}

#[tokio::test]
async fn market_trades_filter_by_both_assets() {
    let usd = credit("USD");
    let transport =
        Arc::new(ScriptedTransport::new().route("/trades?", feed_page(0, 3, 500)));

    let history = client(&transport, StdDuration::from_secs(60))
        .market_trades(&pair(&usd, &native()), Duration::hours(24), None)
        .await;

    assert_eq!(history.len(), 3);
    let url = &transport.requests()[0];
    assert!(url.contains("base_asset_type=credit_alphanum4&base_asset_code=USD"));
    assert!(url.contains("counter_asset_type=native"));
    assert!(!url.contains("counter_asset_code"));
}

#[tokio::test]
async fn market_trades_stop_once_limit_is_reached() {
    let usd = credit("USD");
    let transport = Arc::new(
        ScriptedTransport::new()
            .route("cursor=p199", feed_page(200, 400, 500))
            .route("cursor=p399", feed_page(400, 600, 500))
            .route("/trades?", feed_page(0, 200, 500)),
    );

    let history = client(&transport, StdDuration::from_secs(60))
        .market_trades(&pair(&usd, &native()), Duration::hours(24), Some(250))
        .await;

    assert!(history.is_complete());
    assert_eq!(history.len(), 400);
    assert_eq!(transport.count_matching("/trades?"), 2);
    assert_eq!(transport.count_matching("cursor=p399"), 0);
}

fn latest_price_page(close_time: chrono::DateTime<Utc>) -> String {
    page(vec![trade_record(
        "latest",
        close_time,
        &credit("USD"),
        &native(),
        dec!(2),
        dec!(16),
    )])
}

#[tokio::test]
async fn price_is_cached_until_ttl_expires() {
    let transport = Arc::new(
        ScriptedTransport::new().route("limit=1", latest_price_page(Utc::now())),
    );
    let client = client(&transport, StdDuration::from_millis(100));
    let usd = credit("USD");

    assert_eq!(client.price_in_reference(&usd).await, Some(dec!(8)));
    assert_eq!(client.price_in_reference(&usd).await, Some(dec!(8)));
    assert_eq!(transport.count_matching("limit=1"), 1);
    assert_eq!(client.cached_prices(), 1);

    tokio::time::sleep(StdDuration::from_millis(150)).await;

    assert_eq!(client.price_in_reference(&usd).await, Some(dec!(8)));
    assert_eq!(transport.count_matching("limit=1"), 2);
}

#[tokio::test]
async fn expired_prices_are_dropped_when_a_harvest_starts() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route("limit=1", latest_price_page(Utc::now()))
            .route("/trades?", page(Vec::new())),
    );
    let client = client(&transport, StdDuration::from_millis(100));

    client.price_in_reference(&credit("USD")).await;
    client.price_in_reference(&credit("EUR")).await;
    assert_eq!(client.cached_prices(), 2);

    tokio::time::sleep(StdDuration::from_millis(150)).await;
    client.recent_trades(Duration::hours(24)).await;

    assert_eq!(client.cached_prices(), 0);
}

#[tokio::test]
async fn stale_price_is_unknown() {
    let transport = Arc::new(ScriptedTransport::new().route(
        "limit=1",
        latest_price_page(Utc::now() - Duration::days(4)),
    ));
    let client = client(&transport, StdDuration::from_secs(60));

    assert_eq!(client.price_in_reference(&credit("USD")).await, None);
    assert_eq!(client.cached_prices(), 0);
}

#[tokio::test]
async fn failed_price_lookup_is_not_cached() {
    let transport = Arc::new(ScriptedTransport::new().fail("limit=1", "connection reset"));
    let client = client(&transport, StdDuration::from_secs(60));
    let usd = credit("USD");

    assert_eq!(client.price_in_reference(&usd).await, None);
    assert_eq!(client.price_in_reference(&usd).await, None);
    assert_eq!(transport.count_matching("limit=1"), 2);
}

#[tokio::test]
async fn native_price_needs_no_request() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = client(&transport, StdDuration::from_secs(60));

    assert_eq!(client.price_in_reference(&native()).await, Some(Price::ONE));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn issuer_domain_is_resolved_once() {
    let transport = Arc::new(ScriptedTransport::new().route(
        "/assets?",
        asset_page(Some("https://anchor.example/.well-known/stellar.toml")),
    ));
    let client = client(&transport, StdDuration::from_secs(60));
    let usd = credit("USD");
    let issuer = usd.issuer().unwrap();

    let first = client.issuer_domain("USD", issuer).await;
    let second = client.issuer_domain("USD", issuer).await;

    assert_eq!(first.as_deref(), Some("anchor.example"));
    assert_eq!(second, first);
    assert_eq!(transport.count_matching("/assets?"), 1);
    assert!(transport.requests()[0].contains(&format!("asset_code=USD&asset_issuer={issuer}")));
}

#[tokio::test]
async fn missing_issuer_domain_is_cached() {
    let transport = Arc::new(ScriptedTransport::new().route("/assets?", asset_page(None)));
    let client = client(&transport, StdDuration::from_secs(60));

    assert_eq!(client.issuer_domain("USD", "GISSUER").await, None);
    assert_eq!(client.issuer_domain("USD", "GISSUER").await, None);
    assert_eq!(transport.count_matching("/assets?"), 1);
    assert_eq!(client.cached_domains(), 1);
}

#[tokio::test]
async fn failed_domain_lookup_is_retried() {
    let transport = Arc::new(ScriptedTransport::new().status("/assets?", 500));
    let client = client(&transport, StdDuration::from_secs(60));

    assert_eq!(client.issuer_domain("USD", "GISSUER").await, None);
    assert_eq!(client.issuer_domain("USD", "GISSUER").await, None);
    assert_eq!(transport.count_matching("/assets?"), 2);
    assert_eq!(client.cached_domains(), 0);
}

#[tokio::test]
async fn liquidity_compares_book_depth() {
    let usd = credit("USD");
    let eur = credit("EUR");
    let transport = Arc::new(
        ScriptedTransport::new()
            .route("selling_asset_code=USD", order_book(6, 5))
            .route("selling_asset_code=EUR", order_book(3, 2)),
    );
    let client = client(&transport, StdDuration::from_secs(60));

    assert!(client.has_sufficient_liquidity(&pair(&usd, &native()), 10).await);
    assert!(!client.has_sufficient_liquidity(&pair(&eur, &native()), 10).await);
    assert!(transport.requests()[0].contains("limit=6"));
}

#[tokio::test]
async fn unreachable_order_book_fails_open() {
    let transport = Arc::new(ScriptedTransport::new().fail("/order_book?", "timed out"));
    let client = client(&transport, StdDuration::from_secs(60));

    assert!(
        client
            .has_sufficient_liquidity(&pair(&credit("USD"), &native()), 10)
            .await
    );
}
