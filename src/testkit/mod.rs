//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for assets and trades.
//! - [`market_data`] - [`ScriptedMarketData`](market_data::ScriptedMarketData),
//!   an in-memory [`MarketData`](crate::port::MarketData) with call counters.
//! - [`transport`] - [`ScriptedTransport`](transport::ScriptedTransport),
//!   canned HTTP bodies for exercising the Horizon client.
//! - [`horizon`] - JSON bodies shaped like Horizon responses.

pub mod domain;
pub mod horizon;
pub mod market_data;
pub mod transport;
