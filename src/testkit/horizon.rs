//! JSON bodies shaped like Horizon responses.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::domain::Asset;

/// A `/trades` record. The price rational is `counter_amount / base_amount`.
pub fn trade_record(
    paging_token: &str,
    close_time: DateTime<Utc>,
    base: &Asset,
    counter: &Asset,
    base_amount: Decimal,
    counter_amount: Decimal,
) -> Value {
    let mut record = json!({
        "paging_token": paging_token,
        "ledger_close_time": close_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "base_amount": base_amount.to_string(),
        "counter_amount": counter_amount.to_string(),
        "price": { "n": counter_amount.to_string(), "d": base_amount.to_string() },
    });
    put_asset(&mut record, "base", base);
    put_asset(&mut record, "counter", counter);
    record
}

fn put_asset(record: &mut Value, prefix: &str, asset: &Asset) {
    record[format!("{prefix}_asset_type")] = json!(asset.asset_type().as_str());
    if let Some(issuer) = asset.issuer() {
        record[format!("{prefix}_asset_code")] = json!(asset.code());
        record[format!("{prefix}_asset_issuer")] = json!(issuer);
    }
}

/// A HAL collection page around `records`.
pub fn page(records: Vec<Value>) -> String {
    json!({ "_embedded": { "records": records } }).to_string()
}

/// An `/assets` page with one record pointing at `toml_href`.
pub fn asset_page(toml_href: Option<&str>) -> String {
    let links = match toml_href {
        Some(href) => json!({ "toml": { "href": href } }),
        None => json!({ "toml": { "href": "" } }),
    };
    page(vec![json!({ "_links": links })])
}

/// An `/order_book` body with `bids` and `asks` entries.
pub fn order_book(bids: usize, asks: usize) -> String {
    let level = json!({ "price": "1.0", "amount": "10.0" });
    json!({
        "bids": vec![level.clone(); bids],
        "asks": vec![level; asks],
    })
    .to_string()
}
