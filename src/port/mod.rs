//! Trait definitions (ports). Depend only on domain.
//!
//! - [`MarketData`] - Remote ledger access used by the collector pipeline

mod market_data;

pub use market_data::{MarketData, TradeHistory};
