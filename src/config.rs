//! Endpoint selection and streaming configuration.

use std::time::Duration;

const GLOBAL_API_URL: &str = "https://ftx.com/api";
const US_API_URL: &str = "https://ftx.us/api";
const GLOBAL_WS_URL: &str = "wss://ftx.com/ws/";
const US_WS_URL: &str = "wss://ftx.us/ws/";

const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_RECONNECT_ATTEMPTS: u32 = 10;
const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(1);
const DEFAULT_BUFFER_SIZE: usize = 32;

/// Deployment the client talks to. Selects URLs and the auth header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Global,
    Us,
}

impl Region {
    pub fn api_url(&self) -> &'static str {
        match self {
            Region::Global => GLOBAL_API_URL,
            Region::Us => US_API_URL,
        }
    }

    pub fn ws_url(&self) -> &'static str {
        match self {
            Region::Global => GLOBAL_WS_URL,
            Region::Us => US_WS_URL,
        }
    }

    /// Prefix of the `KEY`/`SIGN`/`TS`/`SUBACCOUNT` REST headers.
    pub fn header_prefix(&self) -> &'static str {
        match self {
            Region::Global => "FTX",
            Region::Us => "FTXUS",
        }
    }
}

/// Exponential reconnect delay: `base * 2^attempt`, optionally capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max_delay: Option<Duration>,
}

impl BackoffPolicy {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            max_delay: None,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Delay before the given 0-based reconnect attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.base.checked_mul(factor))
            .unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_INTERVAL)
    }
}

/// Immutable settings captured by a logical stream when it is created.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint.
    pub url: String,
    /// Read deadline after the last pong; pings go out at 9/10 of it.
    pub timeout: Duration,
    pub reconnect_attempts: u32,
    pub backoff: BackoffPolicy,
    /// How long cancellation waits for the read loop before aborting it.
    pub close_grace: Duration,
    /// Capacity of the internal and caller-facing queues.
    pub buffer_size: usize,
    /// Server clock minus local clock, applied to login timestamps.
    pub server_time_diff_ms: i64,
}

impl StreamConfig {
    pub fn new(region: Region) -> Self {
        Self::with_url(region.ws_url())
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_STREAM_TIMEOUT,
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            backoff: BackoffPolicy::default(),
            close_grace: DEFAULT_CLOSE_GRACE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            server_time_diff_ms: 0,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn close_grace(mut self, grace: Duration) -> Self {
        self.close_grace = grace;
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn server_time_diff_ms(mut self, diff_ms: i64) -> Self {
        self.server_time_diff_ms = diff_ms;
        self
    }

    /// Period of the keepalive ping.
    pub fn ping_interval(&self) -> Duration {
        self.timeout * 9 / 10
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_endpoints() {
        assert_eq!(Region::Global.ws_url(), "wss://ftx.com/ws/");
        assert_eq!(Region::Us.api_url(), "https://ftx.us/api");
        assert_eq!(Region::Us.header_prefix(), "FTXUS");
    }

    #[test]
    fn test_default_backoff_doubles_from_one_second() {
        let backoff = BackoffPolicy::default();
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(5), Duration::from_secs(32));
    }

    #[test]
    fn test_backoff_cap_and_overflow() {
        let capped = BackoffPolicy::new(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500));
        assert_eq!(capped.delay(2), Duration::from_millis(400));
        assert_eq!(capped.delay(3), Duration::from_millis(500));

        let uncapped = BackoffPolicy::default();
        assert_eq!(uncapped.delay(200), Duration::MAX);
    }

    #[test]
    fn test_ping_interval_is_nine_tenths_of_timeout() {
        let config = StreamConfig::default().timeout(Duration::from_secs(60));
        assert_eq!(config.ping_interval(), Duration::from_secs(54));
        let config = config.timeout(Duration::from_millis(1000));
        assert_eq!(config.ping_interval(), Duration::from_millis(900));
    }

    #[test]
    fn test_stream_config_defaults() {
        let config = StreamConfig::new(Region::Us);
        assert_eq!(config.url, "wss://ftx.us/ws/");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.reconnect_attempts, 10);
        assert_eq!(config.close_grace, Duration::from_secs(1));
        assert_eq!(config.buffer_size(0).buffer_size, 1);
    }
}
