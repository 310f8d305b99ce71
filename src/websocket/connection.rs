use super::classifier;
use super::models::{LoginArgs, LoginRequest, Operation, WsEnvelope, WsRequest};
use super::registry::SubscriptionRegistry;
use crate::auth::{self, Credentials};
use crate::config::StreamConfig;
use crate::error::{FtxError, Result};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use log::*;
use serde::Serialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use url::Url;

const WRITE_QUEUE_SIZE: usize = 32;

// Type alias for the WebSocket stream
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle to a connection's writer task. Every outbound frame of a connection goes
/// through this queue, so the socket sink only ever has one writer.
#[derive(Debug, Clone)]
pub struct WsWriter {
    tx: mpsc::Sender<Message>,
}

impl WsWriter {
    pub async fn send(&self, message: Message) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|e| FtxError::WebsocketError(format!("Failed to queue message: {}", e)))
    }

    pub async fn send_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.send(Message::Text(text)).await
    }

    pub async fn ping(&self) -> Result<()> {
        self.send(Message::Ping(Vec::new())).await
    }

    /// Queues a normal-closure close frame.
    pub async fn close(&self) -> Result<()> {
        self.send(Message::Close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        })))
        .await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Read deadline that moves to `now + timeout` whenever the peer shows signs of life.
#[derive(Debug, Clone, Copy)]
pub struct ReadDeadline {
    timeout: Duration,
    at: Instant,
}

impl ReadDeadline {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            at: Instant::now() + timeout,
        }
    }

    pub fn extend(&mut self) {
        self.at = Instant::now() + self.timeout;
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// One physical WebSocket session.
pub struct Connection {
    reader: SplitStream<WsStream>,
    writer: WsWriter,
    writer_handle: JoinHandle<()>,
    authenticated: bool,
    deadline: ReadDeadline,
}

impl Connection {
    /// Dials `config.url` and replays every subscription of `registry`, logging in
    /// first when a private channel is among them.
    pub async fn connect(
        config: &StreamConfig,
        credentials: Option<&Credentials>,
        registry: &SubscriptionRegistry,
    ) -> Result<Self> {
        let mut conn = Self::dial(&config.url, config.timeout).await?;
        conn.subscribe(credentials, config.server_time_diff_ms, registry.snapshot())
            .await?;
        Ok(conn)
    }

    /// Opens the socket and starts the writer task.
    pub async fn dial(url: &str, timeout: Duration) -> Result<Self> {
        let url_obj =
            Url::parse(url).map_err(|e| FtxError::DialFailed(format!("invalid url: {}", e)))?;

        info!("Connecting to WebSocket: {}", url_obj);
        let (ws_stream, response) = connect_async(url_obj.as_str())
            .await
            .map_err(|e| FtxError::DialFailed(format!("WebSocket connection failed: {}", e)))?;
        info!(
            "WebSocket connected successfully. Response: {:?}",
            response.status()
        );

        let (mut write, read) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<Message>(WRITE_QUEUE_SIZE);

        // Nothing may follow a close frame, so the task ends once one is flushed.
        let writer_handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                trace!("Sending WS frame: {}", frame_kind(&message));
                let is_close = matches!(message, Message::Close(_));
                if let Err(e) = write.send(message).await {
                    error!("WebSocket send error: {}. Stopping writer task.", e);
                    break;
                }
                if is_close {
                    break;
                }
            }
            debug!("WebSocket writer task finished.");
        });

        Ok(Self {
            reader: read,
            writer: WsWriter { tx },
            writer_handle,
            authenticated: false,
            deadline: ReadDeadline::new(timeout),
        })
    }

    /// Sends one subscribe frame per request, in order. Private channels trigger a
    /// login first, at most once per connection.
    pub async fn subscribe(
        &mut self,
        credentials: Option<&Credentials>,
        server_time_diff_ms: i64,
        requests: &[WsRequest],
    ) -> Result<()> {
        for req in requests {
            if req.is_private() {
                self.authenticate(credentials, server_time_diff_ms).await?;
            }
            debug!(
                "Sending {:?} for channel {} market {:?}",
                req.op, req.channel, req.market
            );
            self.writer.send_json(req).await?;
        }
        Ok(())
    }

    /// Sends the login frame unless this connection already did.
    pub async fn authenticate(
        &mut self,
        credentials: Option<&Credentials>,
        server_time_diff_ms: i64,
    ) -> Result<()> {
        if self.authenticated {
            return Ok(());
        }
        let credentials = credentials.ok_or(FtxError::AuthRequired)?;

        let time = auth::get_timestamp_ms() + server_time_diff_ms;
        let login = LoginRequest {
            op: Operation::Login,
            args: LoginArgs {
                key: credentials.api_key.clone(),
                sign: credentials.sign(&auth::websocket_login_payload(time))?,
                time,
                subaccount: credentials.subaccount.clone(),
            },
        };
        info!("Authenticating WebSocket connection");
        self.writer.send_json(&login).await?;
        self.authenticated = true;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn writer(&self) -> WsWriter {
        self.writer.clone()
    }

    pub fn deadline(&self) -> &ReadDeadline {
        &self.deadline
    }

    /// Waits for the next data frame and parses its envelope.
    ///
    /// Pings are answered and pongs only move the read deadline. A malformed frame
    /// yields `DecodeFailed`, after which reading can continue.
    pub async fn read_frame(&mut self) -> Result<WsEnvelope> {
        loop {
            let next = match timeout_at(self.deadline.at(), self.reader.next()).await {
                Ok(next) => next,
                Err(_) => {
                    return Err(FtxError::ReadFailed(format!(
                        "no data or pong within {:?}",
                        self.deadline.timeout()
                    )))
                }
            };

            match next {
                Some(Ok(Message::Text(text))) => {
                    trace!("Received WS Text: {}", text);
                    self.deadline.extend();
                    return classifier::parse_envelope(&text);
                }
                Some(Ok(Message::Binary(bin))) => {
                    self.deadline.extend();
                    let text = String::from_utf8(bin)
                        .map_err(|e| FtxError::DecodeFailed(format!("binary frame: {}", e)))?;
                    return classifier::parse_envelope(&text);
                }
                Some(Ok(Message::Ping(data))) => {
                    trace!("Received WS Ping, sending Pong");
                    if let Err(e) = self.writer.send(Message::Pong(data)).await {
                        warn!("Failed to send Pong: {}", e);
                    }
                }
                Some(Ok(Message::Pong(_))) => {
                    trace!("Received WS Pong");
                    self.deadline.extend();
                }
                Some(Ok(Message::Close(frame))) => {
                    return match frame {
                        Some(f) if f.code == CloseCode::Normal => Err(FtxError::Closed),
                        Some(f) => Err(FtxError::ReadFailed(format!(
                            "closed by server: {} {}",
                            f.code, f.reason
                        ))),
                        None => Err(FtxError::ReadFailed(
                            "closed by server without status".to_string(),
                        )),
                    };
                }
                Some(Ok(Message::Frame(_))) => {}
                Some(Err(WsError::ConnectionClosed)) => return Err(FtxError::Closed),
                Some(Err(e)) => return Err(FtxError::ReadFailed(e.to_string())),
                None => {
                    return Err(FtxError::ReadFailed(
                        "stream ended without close frame".to_string(),
                    ))
                }
            }
        }
    }

    /// Queues a normal-closure close frame and waits up to `grace` for the writer task
    /// to flush everything queued before it. The writer is aborted if it does not finish.
    pub async fn close(mut self, grace: Duration) {
        if let Err(e) = self.writer.close().await {
            debug!("Could not send close frame: {}", e);
        }
        if timeout(grace, &mut self.writer_handle).await.is_err() {
            warn!("Close frame not flushed within {:?}, dropping socket.", grace);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.writer_handle.abort();
    }
}

fn frame_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_deadline_extends_to_full_timeout() {
        let timeout = Duration::from_millis(500);
        let mut deadline = ReadDeadline::new(timeout);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let before = Instant::now();
        deadline.extend();
        let after = Instant::now();
        assert!(deadline.at() >= before + timeout);
        assert!(deadline.at() <= after + timeout);
    }

    #[tokio::test]
    async fn test_writer_reports_closed_queue() {
        let (tx, rx) = mpsc::channel(1);
        let writer = WsWriter { tx };
        drop(rx);
        assert!(writer.is_closed());
        assert!(matches!(
            writer.ping().await,
            Err(FtxError::WebsocketError(_))
        ));
    }

    #[tokio::test]
    async fn test_dial_failure_is_reported() {
        let result = Connection::dial("ws://127.0.0.1:1/ws/", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(FtxError::DialFailed(_))));

        let bad_url = Connection::dial("not a url", Duration::from_secs(1)).await;
        assert!(matches!(bad_url, Err(FtxError::DialFailed(_))));
    }
}
