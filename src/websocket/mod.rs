//! Streaming WebSocket client for FTX.
//!
//! [`Stream`] is the entry point. Each `subscribe_to_*` call opens one logical stream
//! and returns a typed [`tokio::sync::mpsc::Receiver`] of `Result` items:
//!
//! - market data: [`Stream::subscribe_to_tickers`], [`Stream::subscribe_to_trades`],
//!   [`Stream::subscribe_to_orderbooks`], [`Stream::subscribe_to_markets`]
//! - account data (login required): [`Stream::subscribe_to_fills`],
//!   [`Stream::subscribe_to_orders`]
//!
//! # Usage
//!
//! ```no_run
//! use ftx_connector_rs::config::{Region, StreamConfig};
//! use ftx_connector_rs::websocket::Stream;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> ftx_connector_rs::Result<()> {
//!     let stream = Stream::new(StreamConfig::new(Region::Global));
//!     let token = CancellationToken::new();
//!
//!     let mut tickers = stream.subscribe_to_tickers(&token, &["BTC-PERP"]).await?;
//!     while let Some(item) = tickers.recv().await {
//!         match item {
//!             Ok(t) => println!("{} bid={:?} ask={:?}", t.base.symbol, t.ticker.bid, t.ticker.ask),
//!             Err(e) => eprintln!("Server rejected subscription: {}", e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Lifecycle
//!
//! - The queue closes when the token is cancelled, the server closes the connection
//!   normally, every subscription is acknowledged as unsubscribed, or reconnection
//!   gives up.
//! - Streams never send `unsubscribe`; cancelling the token is how a caller stops. An
//!   `unsubscribed` acknowledgment therefore only comes from the server dropping a
//!   subscription on its own. It removes that (channel, market) from the stream, so later
//!   reconnects no longer replay it, and the stream ends once nothing is left.
//! - A lost connection is re-dialed with exponential backoff (see
//!   [`BackoffPolicy`](crate::config::BackoffPolicy)); all subscriptions are replayed,
//!   after a fresh login when needed, before new events flow. Data sent during the outage
//!   is not replayed.
//! - A ping is written every `timeout * 9 / 10`. Without any frame or pong for `timeout`
//!   the connection counts as lost.
//! - Server `error` frames arrive as `Err(FtxError::SubscribeFailed { .. })` items and do
//!   not end the stream.

pub mod classifier;
pub mod client;
pub mod connection;
pub mod dispatcher;
pub mod models;
pub mod registry;
mod supervisor;

pub use client::{Stream, StreamReceiver};
pub use models::{
    BaseResponse, Channel, FillResponse, MarketsResponse, OrderBookResponse, OrderResponse,
    ResponseType, ServerMessage, StreamEvent, TickerResponse, TradeResponse, TradesResponse,
    WsRequest,
};
