use super::models::{Channel, WsRequest};

/// The subscriptions of one logical stream, replayed in order on every (re)connect.
///
/// Built once when the stream is created and never mutated afterwards. Duplicate
/// requests (same channel, market and op) keep the position of their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionRegistry {
    requests: Vec<WsRequest>,
}

impl SubscriptionRegistry {
    pub fn new(requests: impl IntoIterator<Item = WsRequest>) -> Self {
        let mut registry: Vec<WsRequest> = Vec::new();
        for req in requests {
            match registry.iter_mut().find(|r| **r == req) {
                Some(existing) => *existing = req,
                None => registry.push(req),
            }
        }
        Self { requests: registry }
    }

    pub fn snapshot(&self) -> &[WsRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether a login must precede the subscribe frames.
    pub fn requires_auth(&self) -> bool {
        self.requests.iter().any(WsRequest::is_private)
    }

    /// Copy of this registry without the subscription acknowledged as removed.
    pub fn without(&self, channel: Channel, market: Option<&str>) -> Self {
        Self {
            requests: self
                .requests
                .iter()
                .filter(|req| !(req.channel == channel && req.market.as_deref() == market))
                .cloned()
                .collect(),
        }
    }

    /// Whether an event on `channel` for `market` belongs to this stream.
    ///
    /// Account-scoped and market-less subscriptions match on channel alone.
    pub fn matches(&self, channel: Channel, market: Option<&str>) -> bool {
        self.requests.iter().any(|req| {
            req.channel == channel
                && match (&req.market, market) {
                    (None, _) => true,
                    (Some(want), Some(got)) => want == got,
                    (Some(_), None) => false,
                }
        })
    }
}
