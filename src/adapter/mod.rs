//! Adapters for external systems.
//!
//! - [`horizon`] - Ledger API client implementing the market data port
//! - [`log_buffer`] - In-memory ring of recent log lines

pub mod horizon;
pub mod log_buffer;
