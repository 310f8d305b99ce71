//! Turns inbound envelopes into typed [`StreamEvent`]s or control outcomes.

use super::models::{
    BaseResponse, Channel, FillResponse, MarketsResponse, OrderBookResponse, OrderResponse,
    ResponseType, ServerMessage, StreamEvent, TickerResponse, TradesResponse, WsEnvelope,
};
use crate::error::{FtxError, Result};
use crate::types::Market;
use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// `info` code sent before the server restarts; clients should reconnect.
pub const SERVER_RESTART_CODE: i64 = 20001;

/// What the read loop should do with one envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Control-only frame, nothing reaches the caller.
    Ignore,
    /// The server acknowledged an unsubscribe.
    Unsubscribed {
        channel: Option<Channel>,
        market: Option<String>,
    },
    /// The server announced a restart.
    Restart,
    Event(StreamEvent),
}

#[derive(Deserialize)]
struct MarketsPayload {
    #[serde(default)]
    action: Option<String>,
    data: HashMap<String, Market>,
}

/// Parses the raw text of a frame into an envelope.
pub fn parse_envelope(text: &str) -> Result<WsEnvelope> {
    serde_json::from_str(text).map_err(|e| FtxError::DecodeFailed(format!("envelope: {}", e)))
}

pub fn classify(envelope: WsEnvelope) -> Result<Classified> {
    let WsEnvelope {
        channel,
        market,
        kind,
        code,
        msg,
        data,
    } = envelope;

    match kind {
        ResponseType::Subscribed | ResponseType::Pong => Ok(Classified::Ignore),
        ResponseType::Unsubscribed => Ok(Classified::Unsubscribed {
            channel: channel.as_deref().and_then(Channel::parse),
            market,
        }),
        ResponseType::Info => {
            if code == Some(SERVER_RESTART_CODE) {
                return Ok(Classified::Restart);
            }
            info!(
                "Server info: code={:?}, msg={}",
                code,
                msg.as_deref().unwrap_or_default()
            );
            Ok(Classified::Ignore)
        }
        ResponseType::Error => Ok(Classified::Event(StreamEvent::Rejected(ServerMessage {
            channel,
            market,
            code: code.unwrap_or_default(),
            message: msg.unwrap_or_default(),
        }))),
        ResponseType::Partial | ResponseType::Update => {
            let name = channel.unwrap_or_default();
            let channel = Channel::parse(&name)
                .ok_or_else(|| FtxError::DecodeFailed(format!("unknown channel '{}'", name)))?;
            let data = data
                .ok_or_else(|| FtxError::DecodeFailed(format!("{} frame without data", channel)))?;
            let base = BaseResponse {
                symbol: market.unwrap_or_default(),
                kind,
            };
            decode_event(channel, base, data).map(Classified::Event)
        }
    }
}

fn decode_event(channel: Channel, base: BaseResponse, data: Value) -> Result<StreamEvent> {
    let event = match channel {
        Channel::Ticker => StreamEvent::Ticker(TickerResponse {
            base,
            ticker: decode(channel, data)?,
        }),
        Channel::Trades => StreamEvent::Trades(TradesResponse {
            base,
            trades: decode(channel, data)?,
        }),
        Channel::OrderBook => StreamEvent::OrderBook(OrderBookResponse {
            base,
            book: decode(channel, data)?,
        }),
        Channel::Fills => StreamEvent::Fill(FillResponse {
            base,
            fill: decode(channel, data)?,
        }),
        Channel::Orders => StreamEvent::Order(OrderResponse {
            base,
            order: decode(channel, data)?,
        }),
        Channel::Markets => {
            let payload: MarketsPayload = decode(channel, data)?;
            StreamEvent::Markets(MarketsResponse {
                base,
                action: payload.action,
                markets: payload.data,
            })
        }
    };
    Ok(event)
}

fn decode<T: DeserializeOwned>(channel: Channel, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| FtxError::DecodeFailed(format!("{} payload: {}", channel, e)))
}
