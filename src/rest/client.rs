use crate::auth::{self, get_timestamp_ms, Credentials};
use crate::config::{Region, StreamConfig};
use crate::error::{FtxError, Result};
use crate::types::*;
use rust_decimal::Decimal;
use crate::websocket::Stream;
use log::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Method, Request, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// A client for the FTX REST API.
///
/// Public endpoints work without credentials. Account endpoints sign every request with
/// `<P>-KEY`, `<P>-SIGN`, `<P>-TS` (and `<P>-SUBACCOUNT` when configured), where `<P>` is
/// `FTX` or `FTXUS` depending on the region.
///
/// # Examples
///
/// ```no_run
/// use ftx_connector_rs::auth::Credentials;
/// use ftx_connector_rs::config::Region;
/// use ftx_connector_rs::rest::Client;
///
/// #[tokio::main]
/// async fn main() -> ftx_connector_rs::Result<()> {
///     let credentials = Credentials::new("your_api_key", "your_secret");
///     let mut client = Client::new(Region::Global, Some(credentials), None)?;
///     client.sync_server_time().await?;
///
///     let book = client.get_orderbook("BTC-PERP", Some(5)).await?;
///     println!("best bid: {:?}", book.bids.first());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http_client: HttpClient,
    /// API root, e.g. `https://ftx.com/api`. Endpoint paths are appended to it.
    base_url: String,
    region: Region,
    credentials: Option<Credentials>,
    /// Server clock minus local clock, added to every signed timestamp.
    server_time_diff_ms: i64,
}

impl Client {
    /// Creates a client for the REST API of `region`.
    pub fn new(
        region: Region,
        credentials: Option<Credentials>,
        timeout_sec: Option<u64>,
    ) -> Result<Self> {
        Self::with_base_url(region.api_url(), region, credentials, timeout_sec)
    }

    /// Creates a client against a custom API root, keeping the header prefix of `region`.
    pub fn with_base_url(
        base_url: &str,
        region: Region,
        credentials: Option<Credentials>,
        timeout_sec: Option<u64>,
    ) -> Result<Self> {
        // Validate early so endpoint calls only fail on their own path.
        Url::parse(base_url)?;

        let timeout_duration = Duration::from_secs(timeout_sec.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
        let http_client = HttpClient::builder().timeout(timeout_duration).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            region,
            credentials,
            server_time_diff_ms: 0,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn server_time_diff_ms(&self) -> i64 {
        self.server_time_diff_ms
    }

    /// Streaming client sharing this client's region, credentials and clock offset.
    pub fn stream(&self) -> Stream {
        let config = StreamConfig::new(self.region).server_time_diff_ms(self.server_time_diff_ms);
        let stream = Stream::new(config);
        match &self.credentials {
            Some(credentials) => stream.with_credentials(credentials.clone()),
            None => stream,
        }
    }

    fn build_url<Q: Serialize>(&self, path: &str, query: Option<&Q>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if let Some(q) = query {
            let query = serde_qs::to_string(q)?;
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }

    /// Builds an unsigned request.
    pub(super) fn build_public_request<Q: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
    ) -> Result<Request> {
        let url = self.build_url(path, query)?;
        Ok(self.http_client.request(method, url).build()?)
    }

    /// Builds a signed request. The signature covers the URL path (including the `/api`
    /// prefix), the encoded query and the exact JSON body that is sent.
    pub(super) fn build_signed_request<Q: Serialize, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Request> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| FtxError::ParameterRequiredError {
                param: "credentials".to_string(),
            })?;

        let url = self.build_url(path, query)?;
        let body_str = match body {
            Some(b) => serde_json::to_string(b)?,
            None => String::new(),
        };

        let timestamp = get_timestamp_ms() + self.server_time_diff_ms;
        let payload = auth::rest_signature_payload(
            timestamp,
            method.as_str(),
            url.path(),
            url.query(),
            body_str.as_bytes(),
        );
        let signature = credentials.sign(&payload)?;

        let prefix = self.region.header_prefix();
        let mut headers = HeaderMap::new();
        headers.insert(
            header_name(prefix, "KEY")?,
            HeaderValue::from_str(&credentials.api_key)?,
        );
        headers.insert(header_name(prefix, "SIGN")?, HeaderValue::from_str(&signature)?);
        headers.insert(header_name(prefix, "TS")?, HeaderValue::from(timestamp));
        if let Some(subaccount) = &credentials.subaccount {
            headers.insert(
                header_name(prefix, "SUBACCOUNT")?,
                HeaderValue::from_str(&encode_component(subaccount))?,
            );
        }
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut request_builder = self.http_client.request(method, url).headers(headers);
        if body.is_some() {
            request_builder = request_builder.body(body_str);
        }

        Ok(request_builder.build()?)
    }

    pub(super) async fn send_request<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        debug!("{} {}", request.method(), request.url().path());
        let response = self.http_client.execute(request).await?;
        Self::handle_response(response).await
    }

    /// Sends a request whose `result`, if any, is of no use to the caller.
    pub(super) async fn send_empty(&self, request: Request) -> Result<()> {
        let _: IgnoredAny = self.send_request(request).await?;
        Ok(())
    }

    /// Unwraps the `{success, result, error}` envelope. Unsuccessful responses become
    /// `ClientError` or `ServerError` depending on the HTTP status.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                let message = format!(
                    "Request failed with status {} (could not parse error body)",
                    status
                );
                return Err(status_error(status, message, headers));
            }
        };

        if envelope.success && status.is_success() {
            return match envelope.result {
                Some(result) => Ok(result),
                None => Ok(serde_json::from_value(serde_json::Value::Null)?),
            };
        }

        let message = envelope
            .error
            .unwrap_or_else(|| "Unknown error message".to_string());
        warn!("Request failed: status={}, error={}", status, message);
        Err(status_error(status, message, headers))
    }

    // --- Public Endpoints ---

    /// Current server time. `GET /time`
    pub async fn get_server_time(&self) -> Result<FtxTime> {
        let request = self.build_public_request::<()>(Method::GET, "/time", None)?;
        self.send_request(request).await
    }

    /// Measures the offset between the server clock and the local clock and applies it
    /// to every later signature, including those of [`Client::stream`].
    pub async fn sync_server_time(&mut self) -> Result<i64> {
        let server_time = self.get_server_time().await?;
        let diff = server_time.as_datetime().timestamp_millis() - get_timestamp_ms();
        info!("Server time offset: {} ms", diff);
        self.server_time_diff_ms = diff;
        Ok(diff)
    }

    /// All markets. `GET /markets`
    pub async fn get_markets(&self) -> Result<Vec<Market>> {
        let request = self.build_public_request::<()>(Method::GET, "/markets", None)?;
        self.send_request(request).await
    }

    /// One market by name. `GET /markets/{market}`
    pub async fn get_market(&self, market: &str) -> Result<Market> {
        let path = format!("/markets/{}", market);
        let request = self.build_public_request::<()>(Method::GET, &path, None)?;
        self.send_request(request).await
    }

    /// Order book snapshot. The server caps `depth` at 100 and defaults to 20.
    /// `GET /markets/{market}/orderbook`
    pub async fn get_orderbook(&self, market: &str, depth: Option<u32>) -> Result<OrderBook> {
        #[derive(Serialize)]
        struct DepthQuery {
            depth: u32,
        }

        let path = format!("/markets/{}/orderbook", market);
        let query = depth.map(|depth| DepthQuery { depth });
        let request = self.build_public_request(Method::GET, &path, query.as_ref())?;
        self.send_request(request).await
    }

    /// Recent trades. `GET /markets/{market}/trades`
    pub async fn get_trades(
        &self,
        market: &str,
        params: Option<GetTradesParams>,
    ) -> Result<Vec<Trade>> {
        let path = format!("/markets/{}/trades", market);
        let request = self.build_public_request(Method::GET, &path, params.as_ref())?;
        self.send_request(request).await
    }

    /// OHLCV candles of a market. `GET /markets/{market}/candles`
    pub async fn get_historical_prices(
        &self,
        market: &str,
        params: GetCandlesParams,
    ) -> Result<Vec<Candle>> {
        let path = format!("/markets/{}/candles", market);
        let request = self.build_public_request(Method::GET, &path, Some(&params))?;
        self.send_request(request).await
    }

    // --- Account ---

    /// `GET /account`
    pub async fn get_account_information(&self) -> Result<AccountInformation> {
        let request = self.build_signed_request::<(), ()>(Method::GET, "/account", None, None)?;
        self.send_request(request).await
    }

    /// `GET /positions`
    pub async fn get_positions(&self) -> Result<Vec<Position>> {
        let request =
            self.build_signed_request::<(), ()>(Method::GET, "/positions", None, None)?;
        self.send_request(request).await
    }

    /// `POST /account/leverage`
    pub async fn change_account_leverage(&self, leverage: Decimal) -> Result<()> {
        #[derive(Serialize)]
        struct LeverageBody {
            leverage: Decimal,
        }

        let body = LeverageBody { leverage };
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/account/leverage",
            None,
            Some(&body),
        )?;
        self.send_empty(request).await
    }

    // --- Orders ---

    /// Open orders, optionally restricted to one market. `GET /orders`
    pub async fn get_open_orders(&self, market: Option<&str>) -> Result<Vec<Order>> {
        #[derive(Serialize)]
        struct MarketQuery<'a> {
            market: &'a str,
        }

        let query = market.map(|market| MarketQuery { market });
        let request =
            self.build_signed_request::<_, ()>(Method::GET, "/orders", query.as_ref(), None)?;
        self.send_request(request).await
    }

    /// `GET /orders/history`
    pub async fn get_orders_history(
        &self,
        params: Option<GetOrdersHistoryParams>,
    ) -> Result<Vec<Order>> {
        let request = self.build_signed_request::<_, ()>(
            Method::GET,
            "/orders/history",
            params.as_ref(),
            None,
        )?;
        self.send_request(request).await
    }

    /// `GET /orders/{order_id}`
    pub async fn get_order(&self, order_id: i64) -> Result<Order> {
        let path = format!("/orders/{}", order_id);
        let request = self.build_signed_request::<(), ()>(Method::GET, &path, None, None)?;
        self.send_request(request).await
    }

    /// `GET /orders/by_client_id/{client_id}`
    pub async fn get_order_by_client_id(&self, client_id: &str) -> Result<Order> {
        let path = format!("/orders/by_client_id/{}", encode_component(client_id));
        let request = self.build_signed_request::<(), ()>(Method::GET, &path, None, None)?;
        self.send_request(request).await
    }

    /// `POST /orders`
    pub async fn place_order(&self, order_req: PlaceOrderRequest) -> Result<Order> {
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/orders",
            None,
            Some(&order_req),
        )?;
        self.send_request(request).await
    }

    /// Queues a cancellation; the server answers with a status message.
    /// `DELETE /orders/{order_id}`
    pub async fn cancel_order(&self, order_id: i64) -> Result<String> {
        let path = format!("/orders/{}", order_id);
        let request = self.build_signed_request::<(), ()>(Method::DELETE, &path, None, None)?;
        self.send_request(request).await
    }

    /// `DELETE /orders/by_client_id/{client_id}`
    pub async fn cancel_order_by_client_id(&self, client_id: &str) -> Result<String> {
        let path = format!("/orders/by_client_id/{}", encode_component(client_id));
        let request = self.build_signed_request::<(), ()>(Method::DELETE, &path, None, None)?;
        self.send_request(request).await
    }

    /// Cancels the order and places a replacement with the changed fields. The returned
    /// order has a new id. `POST /orders/{order_id}/modify`
    pub async fn modify_order(&self, order_id: i64, req: ModifyOrderRequest) -> Result<Order> {
        let path = format!("/orders/{}/modify", order_id);
        let request = self.build_signed_request::<(), _>(Method::POST, &path, None, Some(&req))?;
        self.send_request(request).await
    }

    /// `POST /orders/by_client_id/{client_id}/modify`
    pub async fn modify_order_by_client_id(
        &self,
        client_id: &str,
        req: ModifyOrderRequest,
    ) -> Result<Order> {
        let path = format!("/orders/by_client_id/{}/modify", encode_component(client_id));
        let request = self.build_signed_request::<(), _>(Method::POST, &path, None, Some(&req))?;
        self.send_request(request).await
    }

    /// `DELETE /orders`
    pub async fn cancel_all_orders(&self, req: CancelAllOrdersRequest) -> Result<String> {
        let request =
            self.build_signed_request::<(), _>(Method::DELETE, "/orders", None, Some(&req))?;
        self.send_request(request).await
    }

    // --- Fills ---

    /// `GET /fills`
    pub async fn get_fills(&self, params: Option<GetFillsParams>) -> Result<Vec<Fill>> {
        let request =
            self.build_signed_request::<_, ()>(Method::GET, "/fills", params.as_ref(), None)?;
        self.send_request(request).await
    }
}

/// Percent-encodes a sub-account nickname or client order id for a header or path segment.
pub(super) fn encode_component(raw: &str) -> String {
    // Form encoding writes spaces as '+'; headers and paths want '%20'.
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn header_name(prefix: &str, suffix: &str) -> Result<HeaderName> {
    Ok(HeaderName::from_bytes(
        format!("{}-{}", prefix, suffix).as_bytes(),
    )?)
}

fn status_error(status: reqwest::StatusCode, message: String, header: HeaderMap) -> FtxError {
    if status.is_server_error() {
        FtxError::ServerError {
            status,
            message,
            header,
        }
    } else {
        FtxError::ClientError {
            status,
            message,
            header,
        }
    }
}
