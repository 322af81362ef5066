//! Market identity: an ordered base/counter asset pair.

use std::fmt;
use std::str::FromStr;

use super::asset::Asset;
use super::error::DomainError;

/// Canonical market key `BASE_ID/COUNTER_ID`.
///
/// The inner String is private so every id is built from a [`MarketPair`]
/// or validated on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketId(String);

impl MarketId {
    /// Get the market ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the id back into its base and counter assets.
    pub fn pair(&self) -> Result<MarketPair, DomainError> {
        self.0.parse()
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MarketId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<MarketPair>().map(|pair| pair.id())
    }
}

/// A base/counter asset pair in one orientation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketPair {
    pub base: Asset,
    pub counter: Asset,
}

impl MarketPair {
    #[must_use]
    pub const fn new(base: Asset, counter: Asset) -> Self {
        Self { base, counter }
    }

    #[must_use]
    pub fn id(&self) -> MarketId {
        MarketId(format!("{}/{}", self.base, self.counter))
    }

    /// The same two assets in the opposite orientation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            base: self.counter.clone(),
            counter: self.base.clone(),
        }
    }

    /// Whether either leg is the native reference currency.
    #[must_use]
    pub const fn involves_native(&self) -> bool {
        self.base.is_native() || self.counter.is_native()
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}

impl FromStr for MarketPair {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |_| DomainError::InvalidMarketId { id: s.to_string() };
        let (base, counter) = s
            .split_once('/')
            .ok_or_else(|| DomainError::InvalidMarketId { id: s.to_string() })?;
        Ok(Self {
            base: base.parse().map_err(invalid)?,
            counter: counter.parse().map_err(invalid)?,
        })
    }
}
