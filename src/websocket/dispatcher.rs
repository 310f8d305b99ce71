use super::models::StreamEvent;
use super::registry::SubscriptionRegistry;
use crate::error::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Adapts the shared event queue of a stream to the typed queue handed to the caller.
///
/// Events whose channel and symbol are not in `registry` are dropped. Every other
/// event is passed to `expand`, and the items it returns are forwarded in order.
/// Server rejections are forwarded as `Err` items without going through `expand`.
///
/// The returned receiver closes when the token is cancelled or `events` ends.
pub fn dispatch<T, F>(
    token: CancellationToken,
    registry: Arc<SubscriptionRegistry>,
    mut events: mpsc::Receiver<StreamEvent>,
    buffer: usize,
    expand: F,
) -> mpsc::Receiver<Result<T>>
where
    T: Send + 'static,
    F: Fn(StreamEvent) -> Vec<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Dispatcher cancelled.");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        debug!("Event queue closed, dispatcher finished.");
                        break;
                    }
                },
            };

            for item in route(&registry, &expand, event) {
                tokio::select! {
                    _ = token.cancelled() => return,
                    sent = tx.send(item) => {
                        if sent.is_err() {
                            debug!("Caller dropped its receiver, dispatcher finished.");
                            return;
                        }
                    }
                }
            }
        }
    });

    rx
}

fn route<T, F>(registry: &SubscriptionRegistry, expand: &F, event: StreamEvent) -> Vec<Result<T>>
where
    F: Fn(StreamEvent) -> Vec<T>,
{
    if let StreamEvent::Rejected(msg) = event {
        warn!(
            "Server rejected request: code={}, msg={}",
            msg.code, msg.message
        );
        return vec![Err(msg.into())];
    }

    let relevant = match event.channel() {
        Some(channel) => registry.matches(channel, event.symbol()),
        None => false,
    };
    if !relevant {
        trace!(
            "Dropping event for {:?} {:?}, not subscribed.",
            event.channel(),
            event.symbol()
        );
        return Vec::new();
    }

    expand(event).into_iter().map(Ok).collect()
}
