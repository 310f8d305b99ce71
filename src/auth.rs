use crate::error::{FtxError, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

const WEBSOCKET_LOGIN_SUFFIX: &str = "websocket_login";

/// Gets the current UTC timestamp in milliseconds since the Unix epoch.
pub fn get_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generates a hex encoded HMAC-SHA256 signature of `payload` keyed with the API secret.
///
/// The payload bytes are signed exactly as given; building them correctly is up to the
/// caller (see [`rest_signature_payload`] and [`websocket_login_payload`]).
pub fn generate_signature(secret: &str, payload: &[u8]) -> Result<String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| FtxError::InvalidKey(e.to_string()))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds the bytes signed for an authenticated REST call:
/// `timestamp + METHOD + path [+ "?" + query] [+ body]`.
pub fn rest_signature_payload(
    timestamp_ms: i64,
    method: &str,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> Vec<u8> {
    let mut payload = format!("{}{}{}", timestamp_ms, method, path).into_bytes();
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        payload.push(b'?');
        payload.extend_from_slice(q.as_bytes());
    }
    payload.extend_from_slice(body);
    payload
}

/// Builds the bytes signed for the WebSocket login frame.
pub fn websocket_login_payload(timestamp_ms: i64) -> Vec<u8> {
    format!("{}{}", timestamp_ms, WEBSOCKET_LOGIN_SUFFIX).into_bytes()
}

/// API credentials. The secret is wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
    pub subaccount: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            subaccount: None,
        }
    }

    pub fn with_subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = Some(subaccount.into());
        self
    }

    /// Reads `FTX_KEY`, `FTX_SECRET` and the optional `FTX_SUBACCOUNT` from the environment.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| FtxError::ParameterRequiredError {
                param: name.to_string(),
            })
        };
        let mut credentials = Self::new(var("FTX_KEY")?, var("FTX_SECRET")?);
        credentials.subaccount = std::env::var("FTX_SUBACCOUNT")
            .ok()
            .filter(|s| !s.is_empty());
        Ok(credentials)
    }

    /// Signs `payload` with this account's secret.
    pub fn sign(&self, payload: &[u8]) -> Result<String> {
        generate_signature(&self.api_secret, payload)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("subaccount", &self.subaccount)
            .finish()
    }
}
