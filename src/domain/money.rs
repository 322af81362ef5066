//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume in the reference currency, represented as a Decimal for precision.
pub type Volume = Decimal;
