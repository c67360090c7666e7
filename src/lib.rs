//! Agricultural Market Advisor
//!
//! Generates crop marketing advice for farmers from synthetic market data.
//!
//! ## Architecture
//!
//! ```text
//! DataStore (CSV) → Analyzer (price / sentiment / weather) → Advisor (LLM + cache)
//!                                                                ↑
//!                                              CLI / HTTP API (axum)
//! ```

pub mod advisor;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod types;
