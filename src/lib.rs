//! Pairwatch - top traded markets on the Stellar network.
//!
//! Periodically harvests recent trades from a Horizon server, converts each
//! trade to a volume in the native currency (XLM), ranks the markets by that
//! volume and publishes a snapshot of the most active ones.
//!
//! # Architecture
//!
//! - **`application::aggregator`** - per-market native volume with one
//!   canonical orientation per asset pair
//! - **`application::ranker`** - top-N selection with liquidity and activity
//!   checks
//! - **`application::collector`** - single-flight scheduled cycles
//! - **`adapter::horizon`** - paginated trade harvesting, cached price and
//!   issuer domain lookups
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Assets, markets, trades and the published snapshot
//! - [`port`] - The market data trait the engine depends on
//! - [`adapter`] - Horizon client and the in-memory log buffer
//! - [`application`] - Aggregation, ranking, scheduling and publication
//! - [`app`] - Wiring of the above into a running service
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted market data, scripted HTTP transport and builders
//!
//! # Example
//!
//! ```no_run
//! use pairwatch::adapter::log_buffer::LogBuffer;
//! use pairwatch::app::App;
//! use pairwatch::config::Config;
//!
//! # async fn run() -> pairwatch::error::Result<()> {
//! let app = App::start(&Config::default(), LogBuffer::default())?;
//! if let Some(snapshot) = app.snapshots().latest() {
//!     println!("{} markets", snapshot.len());
//! }
//! app.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
