use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;
use url::ParseError;

pub type Result<T, E = FtxError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum FtxError {
    #[error("Client Error: status={status}, message={message}")]
    ClientError {
        status: StatusCode,
        message: String,
        header: HeaderMap,
    },

    #[error("Server Error: status={status}, message={message}")]
    ServerError {
        status: StatusCode,
        message: String,
        header: HeaderMap,
    },

    #[error("Parameter Required Error: Missing required parameter '{param}'")]
    ParameterRequiredError { param: String },

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("WebSocket dial failed: {0}")]
    DialFailed(String),

    #[error("Credentials are required for private channels")]
    AuthRequired,

    #[error("Subscription rejected: channel={channel}, market={market:?}, code={code}, message={message}")]
    SubscribeFailed {
        channel: String,
        market: Option<String>,
        code: i64,
        message: String,
    },

    #[error("WebSocket read failed: {0}")]
    ReadFailed(String),

    #[error("WebSocket closed normally")]
    Closed,

    #[error("Failed to decode stream message: {0}")]
    DecodeFailed(String),

    #[error("Reconnection failed after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("WebSocket Error: {0}")]
    WebsocketError(String),

    #[error("HTTP Request Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON Serialization/Deserialization Error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Query String Serialization Error: {0}")]
    QueryError(#[from] serde_qs::Error),

    #[error("URL Parsing Error: {0}")]
    UrlParseError(#[from] ParseError),

    #[error("Invalid HTTP Header Value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid HTTP Header Name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
}

impl FtxError {
    /// Whether the supervisor may recover from this error by re-dialing.
    pub fn is_transient(&self) -> bool {
        matches!(self, FtxError::DialFailed(_) | FtxError::ReadFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FtxError::DialFailed("refused".into()).is_transient());
        assert!(FtxError::ReadFailed("reset".into()).is_transient());
        assert!(!FtxError::Closed.is_transient());
        assert!(!FtxError::AuthRequired.is_transient());
        assert!(!FtxError::ReconnectExhausted { attempts: 3 }.is_transient());
    }

    #[test]
    fn test_subscribe_failed_display() {
        let err = FtxError::SubscribeFailed {
            channel: "ticker".into(),
            market: Some("NOPE/USD".into()),
            code: 400,
            message: "Invalid market".into(),
        };
        let text = err.to_string();
        assert!(text.contains("ticker"));
        assert!(text.contains("Invalid market"));
    }
}
