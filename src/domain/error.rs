//! Domain validation errors for ledger types.
//!
//! These errors are returned when wire data or market identities violate
//! the invariants the aggregation engine relies on.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Asset ids look like `CODE-ISSUER` or `XLM-native`.
    #[error("invalid asset id '{id}'")]
    InvalidAssetId {
        /// The rejected id.
        id: String,
    },

    /// Market ids look like `BASE_ID/COUNTER_ID`.
    #[error("invalid market id '{id}'")]
    InvalidMarketId {
        /// The rejected id.
        id: String,
    },

    /// Unknown asset type on the wire.
    #[error("unknown asset type '{value}'")]
    UnknownAssetType {
        /// The rejected type string.
        value: String,
    },

    /// A credit asset arrived without its code or issuer.
    #[error("credit asset is missing its {field}")]
    IncompleteAsset {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Executed price rational with a zero denominator.
    #[error("price denominator must be non-zero")]
    ZeroDenominator,

    /// Traded amounts are never negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount {
        /// Which amount was negative.
        field: &'static str,
        /// The offending value.
        value: rust_decimal::Decimal,
    },

    /// A decimal string could not be parsed exactly.
    #[error("invalid decimal '{value}' for {field}")]
    InvalidDecimal {
        /// Which field failed to parse.
        field: &'static str,
        /// The raw text.
        value: String,
    },

    /// A close time that is not RFC 3339.
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// The raw text.
        value: String,
    },
}
