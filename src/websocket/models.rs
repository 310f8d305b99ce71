use crate::error::FtxError;
use crate::types::{Fill, Market, Order, OrderBook, Ticker, Trade};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// --- Outbound ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Ticker,
    Trades,
    #[serde(rename = "orderbook")]
    OrderBook,
    Fills,
    Orders,
    Markets,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Ticker => "ticker",
            Channel::Trades => "trades",
            Channel::OrderBook => "orderbook",
            Channel::Fills => "fills",
            Channel::Orders => "orders",
            Channel::Markets => "markets",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ticker" => Some(Channel::Ticker),
            "trades" => Some(Channel::Trades),
            "orderbook" => Some(Channel::OrderBook),
            "fills" => Some(Channel::Fills),
            "orders" => Some(Channel::Orders),
            "markets" => Some(Channel::Markets),
            _ => None,
        }
    }

    /// Account-scoped channels that need a login on the connection first.
    pub fn is_private(&self) -> bool {
        matches!(self, Channel::Fills | Channel::Orders)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Subscribe,
    /// Part of the protocol, but streams never send it. They stop by cancellation.
    Unsubscribe,
    Login,
}

/// A subscribe/unsubscribe frame. `market` is omitted for account-scoped channels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WsRequest {
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub market: Option<String>,
    pub op: Operation,
}

impl WsRequest {
    pub fn subscribe(channel: Channel, market: Option<&str>) -> Self {
        Self {
            channel,
            market: market.map(str::to_string),
            op: Operation::Subscribe,
        }
    }

    pub fn is_private(&self) -> bool {
        self.channel.is_private()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoginArgs {
    pub key: String,
    pub sign: String,
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub op: Operation,
    pub args: LoginArgs,
}

// --- Inbound ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Error,
    Subscribed,
    Unsubscribed,
    Info,
    Partial,
    Update,
    Pong,
}

/// Outer wrapper of every inbound stream message.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WsEnvelope {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Routing metadata copied from the envelope onto every decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseResponse {
    pub symbol: String,
    pub kind: ResponseType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerResponse {
    pub base: BaseResponse,
    pub ticker: Ticker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradesResponse {
    pub base: BaseResponse,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeResponse {
    pub base: BaseResponse,
    pub trade: Trade,
}

/// `base.kind` tells whether `book` is a `Partial` snapshot or an `Update` delta.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBookResponse {
    pub base: BaseResponse,
    pub book: OrderBook,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillResponse {
    pub base: BaseResponse,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub base: BaseResponse,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketsResponse {
    pub base: BaseResponse,
    pub action: Option<String>,
    pub markets: HashMap<String, Market>,
}

/// An `error` frame from the server, usually a rejected subscribe or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMessage {
    pub channel: Option<String>,
    pub market: Option<String>,
    pub code: i64,
    pub message: String,
}

impl From<ServerMessage> for FtxError {
    fn from(msg: ServerMessage) -> Self {
        FtxError::SubscribeFailed {
            channel: msg.channel.unwrap_or_default(),
            market: msg.market,
            code: msg.code,
            message: msg.message,
        }
    }
}

/// A decoded, caller-relevant stream message.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Ticker(TickerResponse),
    Trades(TradesResponse),
    OrderBook(OrderBookResponse),
    Fill(FillResponse),
    Order(OrderResponse),
    Markets(MarketsResponse),
    Rejected(ServerMessage),
}

impl StreamEvent {
    pub fn channel(&self) -> Option<Channel> {
        match self {
            StreamEvent::Ticker(_) => Some(Channel::Ticker),
            StreamEvent::Trades(_) => Some(Channel::Trades),
            StreamEvent::OrderBook(_) => Some(Channel::OrderBook),
            StreamEvent::Fill(_) => Some(Channel::Fills),
            StreamEvent::Order(_) => Some(Channel::Orders),
            StreamEvent::Markets(_) => Some(Channel::Markets),
            StreamEvent::Rejected(msg) => msg.channel.as_deref().and_then(Channel::parse),
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        let base = match self {
            StreamEvent::Ticker(r) => &r.base,
            StreamEvent::Trades(r) => &r.base,
            StreamEvent::OrderBook(r) => &r.base,
            StreamEvent::Fill(r) => &r.base,
            StreamEvent::Order(r) => &r.base,
            StreamEvent::Markets(r) => &r.base,
            StreamEvent::Rejected(msg) => return msg.market.as_deref(),
        };
        Some(base.symbol.as_str()).filter(|s| !s.is_empty())
    }
}
