//! Task plumbing of one logical stream.
//!
//! Two tasks run per stream:
//!
//! - the **read loop** owns the current [`Connection`], classifies frames, forwards events
//!   and re-dials with exponential backoff when the connection is lost;
//! - the **keepalive** pings through the current writer, and on cancellation sends a close
//!   frame, waits up to `close_grace` for the read loop and aborts it if needed.
//!
//! The read loop publishes the live [`WsWriter`] on a `watch` channel (`None` while
//! reconnecting) so the keepalive never needs the connection itself. The keepalive ends
//! no later than the read loop. When the read loop ends it drops the event sender, which
//! closes every queue downstream.

use super::classifier::{self, Classified};
use super::connection::{Connection, WsWriter};
use super::models::StreamEvent;
use super::registry::SubscriptionRegistry;
use crate::auth::Credentials;
use crate::config::StreamConfig;
use crate::error::{FtxError, Result};
use log::*;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, timeout, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Everything a stream needs to (re)build its connection.
pub(crate) struct StreamContext {
    pub config: StreamConfig,
    pub credentials: Option<Credentials>,
    pub registry: Arc<SubscriptionRegistry>,
    pub token: CancellationToken,
}

/// Dials, replays `ctx.registry` and starts the read loop and keepalive tasks.
///
/// Errors from this first connect are returned directly. Afterwards failures only
/// show up as the returned queue closing.
pub(crate) async fn spawn_stream(ctx: StreamContext) -> Result<mpsc::Receiver<StreamEvent>> {
    if ctx.registry.requires_auth() && ctx.credentials.is_none() {
        return Err(FtxError::AuthRequired);
    }

    let conn = Connection::connect(&ctx.config, ctx.credentials.as_ref(), &ctx.registry).await?;

    let (events_tx, events_rx) = mpsc::channel(ctx.config.buffer_size);
    let (writer_tx, writer_rx) = watch::channel(Some(conn.writer()));
    let ctx = Arc::new(ctx);

    let reader = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move {
            match run_reader(&ctx, conn, events_tx, writer_tx).await {
                Ok(()) => info!("Stream read loop finished."),
                Err(FtxError::Cancelled) => debug!("Stream read loop cancelled."),
                Err(e) => error!("Stream terminated: {}", e),
            }
        }
    });

    tokio::spawn(run_keepalive(ctx, writer_rx, reader));

    Ok(events_rx)
}

/// Reads until the stream ends normally, the consumer goes away, or reconnection fails.
pub(crate) async fn run_reader(
    ctx: &StreamContext,
    mut conn: Connection,
    events: mpsc::Sender<StreamEvent>,
    writer_tx: watch::Sender<Option<WsWriter>>,
) -> Result<()> {
    let mut active = (*ctx.registry).clone();

    loop {
        let outcome = match conn.read_frame().await {
            Ok(envelope) => classifier::classify(envelope),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Classified::Ignore) => {}
            Ok(Classified::Event(event)) => {
                if events.send(event).await.is_err() {
                    debug!("Event receiver dropped, closing connection.");
                    writer_tx.send_replace(None);
                    conn.close(ctx.config.close_grace).await;
                    return Ok(());
                }
            }
            Ok(Classified::Unsubscribed { channel, market }) => {
                if let Some(channel) = channel {
                    active = active.without(channel, market.as_deref());
                }
                if active.is_empty() {
                    info!("Every subscription was acknowledged as unsubscribed, closing stream.");
                    writer_tx.send_replace(None);
                    conn.close(ctx.config.close_grace).await;
                    return Ok(());
                }
            }
            Ok(Classified::Restart) => {
                warn!("Server announced a restart, reconnecting.");
                writer_tx.send_replace(None);
                conn.close(ctx.config.close_grace).await;
                conn = reconnect(ctx, &active).await?;
                writer_tx.send_replace(Some(conn.writer()));
            }
            Err(FtxError::DecodeFailed(reason)) => {
                warn!("Dropping undecodable frame: {}", reason);
            }
            Err(FtxError::Closed) => {
                info!("WebSocket closed normally.");
                return Ok(());
            }
            Err(e) if ctx.token.is_cancelled() => {
                debug!("Read ended after cancellation: {}", e);
                return Ok(());
            }
            Err(e) if e.is_transient() => {
                warn!("Connection lost: {}", e);
                writer_tx.send_replace(None);
                drop(conn);
                conn = reconnect(ctx, &active).await?;
                writer_tx.send_replace(Some(conn.writer()));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Re-dials up to `reconnect_attempts` times, waiting `backoff.delay(attempt)` before
/// each attempt. Every new connection replays `registry` before it is returned.
pub(crate) async fn reconnect(
    ctx: &StreamContext,
    registry: &SubscriptionRegistry,
) -> Result<Connection> {
    let started = Instant::now();
    let attempts = ctx.config.reconnect_attempts;

    for attempt in 0..attempts {
        let delay = ctx.config.backoff.delay(attempt);
        warn!(
            "Reconnecting in {:?} (attempt {}/{})...",
            delay,
            attempt + 1,
            attempts
        );
        tokio::select! {
            _ = ctx.token.cancelled() => return Err(FtxError::Cancelled),
            _ = sleep(delay) => {}
        }

        match Connection::connect(&ctx.config, ctx.credentials.as_ref(), registry).await {
            Ok(conn) => {
                info!(
                    "Reconnected after {:?}, resubscribed to {} topics.",
                    started.elapsed(),
                    registry.len()
                );
                return Ok(conn);
            }
            Err(e) => error!("Reconnect attempt {} failed: {}", attempt + 1, e),
        }
    }

    error!(
        "Max retries ({}) reached after {:?}. Stopping.",
        attempts,
        started.elapsed()
    );
    Err(FtxError::ReconnectExhausted { attempts })
}

/// Pings every `ping_interval` and handles cancellation of the stream.
pub(crate) async fn run_keepalive(
    ctx: Arc<StreamContext>,
    writer_rx: watch::Receiver<Option<WsWriter>>,
    mut reader: JoinHandle<()>,
) {
    let period = ctx.config.ping_interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ctx.token.cancelled() => {
                info!("Stream cancelled, closing connection.");
                let writer = writer_rx.borrow().clone();
                if let Some(writer) = writer {
                    if let Err(e) = writer.close().await {
                        debug!("Could not send close frame: {}", e);
                    }
                }
                if timeout(ctx.config.close_grace, &mut reader).await.is_err() {
                    warn!(
                        "Read loop still running after {:?}, aborting it.",
                        ctx.config.close_grace
                    );
                    reader.abort();
                }
                return;
            }
            _ = &mut reader => {
                debug!("Read loop finished, stopping keepalive.");
                return;
            }
            _ = ticker.tick() => {
                let writer = writer_rx.borrow().clone();
                match writer {
                    Some(writer) => {
                        trace!("Sending keepalive ping.");
                        if let Err(e) = writer.ping().await {
                            debug!("Ping not sent: {}", e);
                        }
                    }
                    None => trace!("Reconnecting, skipping ping."),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffPolicy;
    use crate::websocket::models::{Channel, WsRequest};
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn context(url: String, attempts: u32) -> StreamContext {
        StreamContext {
            config: StreamConfig::with_url(url)
                .reconnect_attempts(attempts)
                .backoff(BackoffPolicy::new(Duration::from_millis(5))),
            credentials: None,
            registry: Arc::new(SubscriptionRegistry::new(vec![WsRequest::subscribe(
                Channel::Ticker,
                Some("ETH/BTC"),
            )])),
            token: CancellationToken::new(),
        }
    }

    async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("ws://{}/ws/", addr)
    }

    #[tokio::test]
    async fn test_reconnect_exhausts_budget() {
        let ctx = context(refused_url().await, 3);
        let result = reconnect(&ctx, &ctx.registry).await;
        assert!(matches!(
            result,
            Err(FtxError::ReconnectExhausted { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_reconnect_wait_is_cut_short_by_cancellation() {
        let mut ctx = context(refused_url().await, 5);
        ctx.config.backoff = BackoffPolicy::new(Duration::from_secs(60));
        ctx.token.cancel();

        let started = Instant::now();
        let result = reconnect(&ctx, &ctx.registry).await;
        assert!(matches!(result, Err(FtxError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spawn_stream_requires_credentials_for_private_channels() {
        let mut ctx = context(refused_url().await, 1);
        ctx.registry = Arc::new(SubscriptionRegistry::new(vec![WsRequest::subscribe(
            Channel::Orders,
            None,
        )]));
        assert!(matches!(
            spawn_stream(ctx).await,
            Err(FtxError::AuthRequired)
        ));
    }
}
