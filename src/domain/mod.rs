//! Ledger domain types: assets, markets, trades, and snapshots.

pub mod asset;
pub mod error;
pub mod market;
pub mod money;
pub mod snapshot;
pub mod trade;

pub use asset::{Asset, AssetType, NATIVE_CODE, NATIVE_MARKER};
pub use error::DomainError;
pub use market::{MarketId, MarketPair};
pub use money::{Price, Volume};
pub use snapshot::{AssetRecord, Issuer, Snapshot, TopExchange};
pub use trade::{PriceRatio, Trade};
