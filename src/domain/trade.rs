//! Executed trades harvested from the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::asset::Asset;
use super::error::DomainError;
use super::market::MarketPair;
use super::money::{Price, Volume};

/// Executed price as the rational `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRatio {
    pub numerator: Decimal,
    pub denominator: Decimal,
}

impl PriceRatio {
    /// Build a ratio, rejecting a zero denominator.
    pub fn new(numerator: Decimal, denominator: Decimal) -> Result<Self, DomainError> {
        if denominator.is_zero() {
            return Err(DomainError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The ratio as a decimal.
    #[must_use]
    pub fn value(&self) -> Price {
        self.numerator / self.denominator
    }
}

/// A single executed exchange event. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    paging_token: String,
    close_time: DateTime<Utc>,
    pair: MarketPair,
    base_amount: Volume,
    counter_amount: Volume,
    price: PriceRatio,
}

impl Trade {
    /// Create a trade, validating that both amounts are non-negative.
    pub fn try_new(
        paging_token: impl Into<String>,
        close_time: DateTime<Utc>,
        base: Asset,
        counter: Asset,
        base_amount: Volume,
        counter_amount: Volume,
        price: PriceRatio,
    ) -> Result<Self, DomainError> {
        if base_amount.is_sign_negative() {
            return Err(DomainError::NegativeAmount {
                field: "base_amount",
                value: base_amount,
            });
        }
        if counter_amount.is_sign_negative() {
            return Err(DomainError::NegativeAmount {
                field: "counter_amount",
                value: counter_amount,
            });
        }
        Ok(Self {
            paging_token: paging_token.into(),
            close_time,
            pair: MarketPair::new(base, counter),
            base_amount,
            counter_amount,
            price,
        })
    }

    #[must_use]
    pub fn paging_token(&self) -> &str {
        &self.paging_token
    }

    #[must_use]
    pub const fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }

    /// Market in the orientation it was executed in.
    #[must_use]
    pub const fn pair(&self) -> &MarketPair {
        &self.pair
    }

    #[must_use]
    pub const fn base(&self) -> &Asset {
        &self.pair.base
    }

    #[must_use]
    pub const fn counter(&self) -> &Asset {
        &self.pair.counter
    }

    #[must_use]
    pub const fn base_amount(&self) -> Volume {
        self.base_amount
    }

    #[must_use]
    pub const fn counter_amount(&self) -> Volume {
        self.counter_amount
    }

    #[must_use]
    pub const fn price(&self) -> PriceRatio {
        self.price
    }

    /// Price of the base asset expressed in the counter asset.
    #[must_use]
    pub fn base_price(&self) -> Price {
        self.price.value()
    }

    /// Volume in the reference currency when one leg is the native asset.
    #[must_use]
    pub fn native_volume(&self) -> Option<Volume> {
        if self.counter().is_native() {
            Some(self.counter_amount)
        } else if self.base().is_native() {
            Some(self.base_amount)
        } else {
            None
        }
    }
}
