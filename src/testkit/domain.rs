//! Builders for domain primitives used across tests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Asset, MarketPair, PriceRatio, Trade};

/// A syntactically plausible issuer account derived from `code`.
pub fn issuer_for(code: &str) -> String {
    let mut issuer = format!("G{}", code.to_ascii_uppercase());
    while issuer.len() < 56 {
        issuer.push('A');
    }
    issuer
}

/// The native reference asset.
pub fn native() -> Asset {
    Asset::native()
}

/// A credit asset with a deterministic issuer.
pub fn credit(code: &str) -> Asset {
    Asset::credit(code, issuer_for(code))
}

/// A market between `base` and `counter`.
pub fn pair(base: &Asset, counter: &Asset) -> MarketPair {
    MarketPair::new(base.clone(), counter.clone())
}

/// A trade closed now, priced at `counter_amount / base_amount`.
pub fn trade(
    base: &Asset,
    counter: &Asset,
    base_amount: Decimal,
    counter_amount: Decimal,
) -> Trade {
    trade_at(Utc::now(), base, counter, base_amount, counter_amount)
}

/// A trade closed at `close_time`, priced at `counter_amount / base_amount`.
pub fn trade_at(
    close_time: DateTime<Utc>,
    base: &Asset,
    counter: &Asset,
    base_amount: Decimal,
    counter_amount: Decimal,
) -> Trade {
    let price = if base_amount.is_zero() {
        PriceRatio::new(Decimal::ONE, Decimal::ONE)
    } else {
        PriceRatio::new(counter_amount, base_amount)
    };
    build(close_time, base, counter, base_amount, counter_amount, price.unwrap())
}

/// A trade closed now with an explicit base price.
pub fn priced_trade(
    base: &Asset,
    counter: &Asset,
    base_amount: Decimal,
    counter_amount: Decimal,
    price: Decimal,
) -> Trade {
    let price = PriceRatio::new(price, Decimal::ONE).unwrap();
    build(Utc::now(), base, counter, base_amount, counter_amount, price)
}

/// `n` identical one-unit trades on `market`.
pub fn trades_on(market: &MarketPair, n: usize) -> Vec<Trade> {
    (0..n)
        .map(|_| trade(&market.base, &market.counter, Decimal::ONE, Decimal::ONE))
        .collect()
}

fn build(
    close_time: DateTime<Utc>,
    base: &Asset,
    counter: &Asset,
    base_amount: Decimal,
    counter_amount: Decimal,
    price: PriceRatio,
) -> Trade {
    let token = format!("{}-{}", close_time.timestamp_millis(), base.code());
    Trade::try_new(
        token,
        close_time,
        base.clone(),
        counter.clone(),
        base_amount,
        counter_amount,
        price,
    )
    .unwrap()
}
