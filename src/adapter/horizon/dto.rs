//! Horizon API response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::domain::{Asset, DomainError, PriceRatio, Trade};

/// HAL collection page: `{ "_embedded": { "records": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "_embedded", default = "Embedded::empty")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Deserialize)]
pub struct Embedded<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

impl<T> Embedded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.embedded.records
    }
}

/// Numbers that Horizon renders either as JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Text(String),
    Integer(i64),
}

impl Numeric {
    fn to_decimal(&self, field: &'static str) -> Result<Decimal, DomainError> {
        match self {
            Self::Text(text) => parse_decimal(text, field),
            Self::Integer(value) => Ok(Decimal::from(*value)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceRecord {
    pub n: Numeric,
    pub d: Numeric,
}

/// As seen on `{HORIZON}/trades`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecord {
    pub paging_token: String,
    pub ledger_close_time: String,
    pub base_amount: String,
    pub base_asset_type: String,
    pub base_asset_code: Option<String>,
    pub base_asset_issuer: Option<String>,
    pub counter_amount: String,
    pub counter_asset_type: String,
    pub counter_asset_code: Option<String>,
    pub counter_asset_issuer: Option<String>,
    pub price: Option<PriceRecord>,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = DomainError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let close_time = DateTime::parse_from_rfc3339(&record.ledger_close_time)
            .map_err(|_| DomainError::InvalidTimestamp {
                value: record.ledger_close_time.clone(),
            })?
            .with_timezone(&Utc);

        let base = Asset::from_wire(
            &record.base_asset_type,
            record.base_asset_code.as_deref(),
            record.base_asset_issuer.as_deref(),
        )?;
        let counter = Asset::from_wire(
            &record.counter_asset_type,
            record.counter_asset_code.as_deref(),
            record.counter_asset_issuer.as_deref(),
        )?;

        let base_amount = parse_decimal(&record.base_amount, "base_amount")?;
        let counter_amount = parse_decimal(&record.counter_amount, "counter_amount")?;

        // Older records omit the rational; derive it from the traded amounts.
        let price = match &record.price {
            Some(price) => PriceRatio::new(
                price.n.to_decimal("price.n")?,
                price.d.to_decimal("price.d")?,
            )?,
            None => PriceRatio::new(counter_amount, base_amount)?,
        };

        Trade::try_new(
            record.paging_token,
            close_time,
            base,
            counter,
            base_amount,
            counter_amount,
            price,
        )
    }
}

/// As seen on `{HORIZON}/assets`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    #[serde(rename = "_links")]
    pub links: Option<AssetLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetLinks {
    pub toml: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: Option<String>,
}

impl AssetRecord {
    /// URL of the issuer's published metadata file, if any.
    #[must_use]
    pub fn toml_href(&self) -> Option<&str> {
        self.links
            .as_ref()?
            .toml
            .as_ref()?
            .href
            .as_deref()
            .filter(|href| !href.trim().is_empty())
    }
}

/// As seen on `{HORIZON}/order_book`. Only the entry counts matter.
#[derive(Debug, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<IgnoredAny>,
    #[serde(default)]
    pub asks: Vec<IgnoredAny>,
}

impl OrderBook {
    #[must_use]
    pub fn depth(&self) -> usize {
        self.bids.len() + self.asks.len()
    }
}

fn parse_decimal(text: &str, field: &'static str) -> Result<Decimal, DomainError> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| DomainError::InvalidDecimal {
            field,
            value: text.to_string(),
        })
}
