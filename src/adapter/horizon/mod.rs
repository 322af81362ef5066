//! Horizon ledger API adapter.
//!
//! Fetches paginated trade history, native prices, issuer domains, and
//! order-book depth, caching the lookups that rarely change.

mod cache;
mod client;
mod dto;
mod query;
mod transport;

pub use cache::TtlCache;
pub use client::{HorizonClient, PRICE_STALENESS_DAYS};
pub use query::{Endpoints, TRADES_PAGE_SIZE};
pub use transport::{ReqwestTransport, Transport};
