//! Published top-market snapshot and its JSON shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::asset::Asset;

/// Issuing account of a credit asset with its resolved home domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issuer {
    pub address: String,
    pub domain: Option<String>,
}

/// Asset as published: code plus enriched issuer, `null` for native.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub code: String,
    pub issuer: Option<Issuer>,
}

impl AssetRecord {
    /// Build a record for `asset`, attaching `domain` when it has an issuer.
    #[must_use]
    pub fn new(asset: &Asset, domain: Option<String>) -> Self {
        Self {
            code: asset.code().to_string(),
            issuer: asset.issuer().map(|address| Issuer {
                address: address.to_string(),
                domain,
            }),
        }
    }
}

/// A ranked market expanded into full asset records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopExchange {
    pub base_asset: AssetRecord,
    pub counter_asset: AssetRecord,
}

/// Latest ranked result, ordered by descending volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub top_exchanges: Vec<TopExchange>,
}

impl Snapshot {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, top_exchanges: Vec<TopExchange>) -> Self {
        Self {
            timestamp,
            top_exchanges,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.top_exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_exchanges.is_empty()
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
