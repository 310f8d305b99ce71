// tests/common.rs
#![allow(dead_code)]

use ftx_connector_rs::config::{BackoffPolicy, StreamConfig};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

static INIT: Once = Once::new();

// Loads .env (for the ignored live tests) and installs the test logger once.
pub fn setup() {
    INIT.call_once(|| {
        if dotenv::from_path(".env").is_err() {
            let _ = dotenv::from_path("../.env");
        }
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn get_env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} environment variable not set", name))
}

/// Short timeouts so reconnect and shutdown paths finish quickly.
pub fn test_config(url: &str) -> StreamConfig {
    StreamConfig::with_url(url)
        .timeout(Duration::from_secs(5))
        .reconnect_attempts(3)
        .backoff(BackoffPolicy::new(Duration::from_millis(10)))
        .close_grace(Duration::from_millis(200))
        .buffer_size(16)
}

/// A frame received by the mock server.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Text(String),
    Ping,
    Close(Option<u16>),
}

/// What a scripted connection does after sending its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    /// Keep reading (answering pings and closes) until the client goes away.
    Hold,
    /// Drop the socket without a close frame.
    Drop,
    /// Send a normal-closure close frame.
    CloseNormal,
    /// Stop reading and keep the socket open, so a close is never answered.
    IgnoreClose,
}

/// Script for one accepted connection: wait for `expect_frames` text frames, send
/// `replies`, then behave as `then`.
#[derive(Debug, Clone)]
pub struct ScriptedConnection {
    pub expect_frames: usize,
    pub replies: Vec<String>,
    pub then: Then,
}

impl ScriptedConnection {
    pub fn new(expect_frames: usize, replies: Vec<Value>, then: Then) -> Self {
        Self {
            expect_frames,
            replies: replies.iter().map(Value::to_string).collect(),
            then,
        }
    }
}

type Recorded = Arc<Mutex<Vec<Vec<Frame>>>>;

/// In-process WebSocket server. Connection `i` follows `scripts[i]`; once every script
/// has been used the listener is dropped, so later dials are refused.
pub struct MockWsServer {
    pub url: String,
    frames: Recorded,
}

impl MockWsServer {
    pub async fn start(scripts: Vec<ScriptedConnection>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws/", listener.local_addr().unwrap());
        let frames: Recorded = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&frames);
        tokio::spawn(async move {
            for script in scripts {
                let (tcp, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => return,
                };
                let index = {
                    let mut all = recorded.lock().unwrap();
                    all.push(Vec::new());
                    all.len() - 1
                };
                tokio::spawn(serve(tcp, script, index, Arc::clone(&recorded)));
            }
        });

        Self { url, frames }
    }

    pub fn connections(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn frames(&self, connection: usize) -> Vec<Frame> {
        self.frames
            .lock()
            .unwrap()
            .get(connection)
            .cloned()
            .unwrap_or_default()
    }

    /// Text frames of one connection, parsed as JSON.
    pub fn texts(&self, connection: usize) -> Vec<Value> {
        self.frames(connection)
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Text(text) => serde_json::from_str(&text).ok(),
                _ => None,
            })
            .collect()
    }

    /// Polls `condition` until it holds or `within` elapses.
    pub async fn wait_until(&self, within: Duration, condition: impl Fn(&Self) -> bool) -> bool {
        let deadline = Instant::now() + within;
        while Instant::now() < deadline {
            if condition(self) {
                return true;
            }
            sleep(Duration::from_millis(10)).await;
        }
        condition(self)
    }
}

async fn serve(tcp: TcpStream, script: ScriptedConnection, index: usize, frames: Recorded) {
    let mut ws = match accept_async(tcp).await {
        Ok(ws) => ws,
        Err(_) => return,
    };

    let mut texts = 0;
    while texts < script.expect_frames {
        match ws.next().await {
            Some(Ok(message)) => {
                if matches!(message, Message::Text(_)) {
                    texts += 1;
                }
                record(&frames, index, &message);
            }
            _ => return,
        }
    }

    for reply in script.replies {
        if ws.send(Message::Text(reply)).await.is_err() {
            return;
        }
    }

    match script.then {
        Then::Hold => drain(ws, index, &frames).await,
        Then::Drop => drop(ws),
        Then::CloseNormal => {
            let close = Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            }));
            if ws.send(close).await.is_ok() {
                drain(ws, index, &frames).await;
            }
        }
        Then::IgnoreClose => {
            sleep(Duration::from_secs(30)).await;
            drop(ws);
        }
    }
}

async fn drain(mut ws: WebSocketStream<TcpStream>, index: usize, frames: &Recorded) {
    while let Some(Ok(message)) = ws.next().await {
        record(frames, index, &message);
    }
}

fn record(frames: &Recorded, index: usize, message: &Message) {
    let frame = match message {
        Message::Text(text) => Frame::Text(text.clone()),
        Message::Ping(_) => Frame::Ping,
        Message::Close(close) => Frame::Close(close.as_ref().map(|c| u16::from(c.code))),
        _ => return,
    };
    frames.lock().unwrap()[index].push(frame);
}

// --- Payload builders ---

pub fn ticker_update(market: &str, bid: &str, ask: &str) -> Value {
    serde_json::json!({
        "channel": "ticker",
        "market": market,
        "type": "update",
        "data": {"bid": bid, "ask": ask, "bidSize": "1", "askSize": "1", "last": bid, "time": 1612345678.5}
    })
}

pub fn subscribed(channel: &str, market: Option<&str>) -> Value {
    serde_json::json!({"type": "subscribed", "channel": channel, "market": market})
}

pub fn unsubscribed(channel: &str, market: Option<&str>) -> Value {
    serde_json::json!({"type": "unsubscribed", "channel": channel, "market": market})
}

pub fn fill_update(id: i64) -> Value {
    serde_json::json!({
        "channel": "fills",
        "type": "update",
        "data": {
            "id": id,
            "market": "BTC-PERP",
            "future": "BTC-PERP",
            "baseCurrency": null,
            "quoteCurrency": null,
            "orderId": 1000 + id,
            "tradeId": 2000 + id,
            "price": 4.201,
            "side": "buy",
            "size": 9.0,
            "fee": 0.0,
            "feeCurrency": "USD",
            "feeRate": 0.0005,
            "liquidity": "taker",
            "time": "2019-05-07T16:40:58.358438+00:00",
            "type": "order"
        }
    })
}

pub fn order_update(id: i64, status: &str) -> Value {
    serde_json::json!({
        "channel": "orders",
        "type": "update",
        "data": {
            "id": id,
            "clientId": null,
            "market": "XRP-PERP",
            "type": "limit",
            "side": "buy",
            "price": 0.306525,
            "size": 31431.0,
            "status": status,
            "filledSize": 0.0,
            "remainingSize": 31431.0,
            "avgFillPrice": null,
            "reduceOnly": false,
            "ioc": false,
            "postOnly": false,
            "createdAt": "2019-03-05T09:56:55.728933+00:00"
        }
    })
}
