use super::dispatcher::dispatch;
use super::models::{
    Channel, FillResponse, OrderBookResponse, OrderResponse, StreamEvent, TickerResponse,
    TradeResponse, WsRequest,
};
use super::registry::SubscriptionRegistry;
use super::supervisor::{spawn_stream, StreamContext};
use crate::auth::Credentials;
use crate::config::StreamConfig;
use crate::error::{FtxError, Result};
use crate::types::Market;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Item type of every subscription queue.
pub type StreamReceiver<T> = mpsc::Receiver<Result<T>>;

/// Entry point for the streaming API.
///
/// Every `subscribe_to_*` call opens its own connection, replays its subscriptions
/// after each reconnect and hands back a queue that closes when the stream ends.
/// Cancelling `token` tears the stream down.
#[derive(Debug, Clone)]
pub struct Stream {
    config: StreamConfig,
    credentials: Option<Credentials>,
}

impl Stream {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            credentials: None,
        }
    }

    /// Credentials used to log in before subscribing to `fills` or `orders`.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Best bid/offer and last trade price for each of `symbols`.
    pub async fn subscribe_to_tickers(
        &self,
        token: &CancellationToken,
        symbols: &[&str],
    ) -> Result<StreamReceiver<TickerResponse>> {
        let requests = market_requests(Channel::Ticker, symbols)?;
        self.open(token, requests, |event| match event {
            StreamEvent::Ticker(ticker) => vec![ticker],
            _ => Vec::new(),
        })
        .await
    }

    /// Trades of each of `symbols`, one item per trade in the order the server sent them.
    pub async fn subscribe_to_trades(
        &self,
        token: &CancellationToken,
        symbols: &[&str],
    ) -> Result<StreamReceiver<TradeResponse>> {
        let requests = market_requests(Channel::Trades, symbols)?;
        self.open(token, requests, |event| match event {
            StreamEvent::Trades(trades) => {
                let base = trades.base;
                trades
                    .trades
                    .into_iter()
                    .map(|trade| TradeResponse {
                        base: base.clone(),
                        trade,
                    })
                    .collect()
            }
            _ => Vec::new(),
        })
        .await
    }

    /// Order book snapshots (`partial`) followed by deltas (`update`) for each of `symbols`.
    pub async fn subscribe_to_orderbooks(
        &self,
        token: &CancellationToken,
        symbols: &[&str],
    ) -> Result<StreamReceiver<OrderBookResponse>> {
        let requests = market_requests(Channel::OrderBook, symbols)?;
        self.open(token, requests, |event| match event {
            StreamEvent::OrderBook(book) => vec![book],
            _ => Vec::new(),
        })
        .await
    }

    /// Fills of the account. Requires credentials.
    pub async fn subscribe_to_fills(
        &self,
        token: &CancellationToken,
    ) -> Result<StreamReceiver<FillResponse>> {
        let requests = vec![WsRequest::subscribe(Channel::Fills, None)];
        self.open(token, requests, |event| match event {
            StreamEvent::Fill(fill) => vec![fill],
            _ => Vec::new(),
        })
        .await
    }

    /// Order updates of the account. Requires credentials.
    pub async fn subscribe_to_orders(
        &self,
        token: &CancellationToken,
    ) -> Result<StreamReceiver<OrderResponse>> {
        let requests = vec![WsRequest::subscribe(Channel::Orders, None)];
        self.open(token, requests, |event| match event {
            StreamEvent::Order(order) => vec![order],
            _ => Vec::new(),
        })
        .await
    }

    /// Market definitions, one item per market in each snapshot or update.
    pub async fn subscribe_to_markets(
        &self,
        token: &CancellationToken,
    ) -> Result<StreamReceiver<Market>> {
        let requests = vec![WsRequest::subscribe(Channel::Markets, None)];
        self.open(token, requests, |event| match event {
            StreamEvent::Markets(markets) => markets.markets.into_values().collect(),
            _ => Vec::new(),
        })
        .await
    }

    async fn open<T, F>(
        &self,
        token: &CancellationToken,
        requests: Vec<WsRequest>,
        expand: F,
    ) -> Result<StreamReceiver<T>>
    where
        T: Send + 'static,
        F: Fn(StreamEvent) -> Vec<T> + Send + 'static,
    {
        let registry = Arc::new(SubscriptionRegistry::new(requests));
        info!(
            "Opening stream to {} with {} subscriptions",
            self.config.url,
            registry.len()
        );

        let events = spawn_stream(StreamContext {
            config: self.config.clone(),
            credentials: self.credentials.clone(),
            registry: Arc::clone(&registry),
            token: token.clone(),
        })
        .await?;

        Ok(dispatch(
            token.clone(),
            registry,
            events,
            self.config.buffer_size,
            expand,
        ))
    }
}

fn market_requests(channel: Channel, symbols: &[&str]) -> Result<Vec<WsRequest>> {
    if symbols.is_empty() {
        return Err(FtxError::ParameterRequiredError {
            param: "symbols".to_string(),
        });
    }
    Ok(symbols
        .iter()
        .map(|symbol| WsRequest::subscribe(channel, Some(symbol)))
        .collect())
}
