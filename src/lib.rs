//! Rust client for the FTX exchange.
//!
//! - [`rest::Client`]: signed REST requests for market data, account, orders and fills.
//! - [`websocket::Stream`]: typed, self-healing WebSocket subscriptions delivered over
//!   `tokio` channels.

pub mod auth;
pub mod config;
pub mod error;
pub mod rest;
pub mod types;
pub mod websocket;

pub use auth::Credentials;
pub use config::{BackoffPolicy, Region, StreamConfig};
pub use error::{FtxError, Result};
pub use websocket::Stream;
