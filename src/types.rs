use crate::error::FtxError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// --- Enums ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Open,
    Closed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Liquidity {
    Maker,
    Taker,
}

/// Kind of a conditional order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TriggerOrderType {
    Stop,
    TrailingStop,
    TakeProfit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOrderStatus {
    Open,
    Cancelled,
    Triggered,
}

/// Candle width. Serialized as its length in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Sec15,
    Minute,
    Minute5,
    Minute15,
    Hour,
    Hour4,
    Day,
}

impl Resolution {
    pub fn seconds(self) -> u32 {
        match self {
            Resolution::Sec15 => 15,
            Resolution::Minute => 60,
            Resolution::Minute5 => 300,
            Resolution::Minute15 => 900,
            Resolution::Hour => 3600,
            Resolution::Hour4 => 14400,
            Resolution::Day => 86400,
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.seconds())
    }
}

// --- Time ---

/// Exchange timestamp. Arrives either as fractional epoch seconds or as an ISO-8601 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FtxTime(pub DateTime<Utc>);

impl FtxTime {
    /// Splits fractional epoch seconds into whole seconds and nanoseconds.
    pub fn from_epoch_seconds(secs: f64) -> Option<Self> {
        if !secs.is_finite() {
            return None;
        }
        let mut whole = secs.floor();
        let mut nanos = ((secs - whole) * 1e9).round();
        if nanos >= 1e9 {
            whole += 1.0;
            nanos = 0.0;
        }
        Utc.timestamp_opt(whole as i64, nanos as u32)
            .single()
            .map(FtxTime)
    }

    fn parse_iso(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(FtxTime(dt.with_timezone(&Utc)));
        }
        // Some endpoints omit the offset; those are UTC.
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| FtxTime(Utc.from_utc_datetime(&naive)))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<'de> Deserialize<'de> for FtxTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Numbers keep their source text, so an epoch float is only read as f64 here.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_f64()
                .and_then(FtxTime::from_epoch_seconds)
                .ok_or_else(|| de::Error::custom(format!("invalid epoch timestamp: {}", n))),
            serde_json::Value::String(s) => FtxTime::parse_iso(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {}", s))),
            other => Err(de::Error::custom(format!(
                "expected epoch seconds or ISO-8601 string, got {}",
                other
            ))),
        }
    }
}

impl Serialize for FtxTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = self.0.timestamp() as f64 + f64::from(self.0.timestamp_subsec_nanos()) / 1e9;
        serializer.serialize_f64(secs)
    }
}

// --- Market Data ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Market {
    pub name: String,
    pub underlying: Option<String>,
    pub base_currency: Option<String>,
    pub quote_currency: Option<String>,
    pub enabled: bool,
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub last: Option<Decimal>,
    pub post_only: bool,
    pub price_increment: Option<Decimal>,
    pub size_increment: Option<Decimal>,
    pub restricted: bool,
    pub min_provide_size: Option<Decimal>,
    pub volume_usd24h: Option<Decimal>,
    #[serde(rename = "type")]
    pub market_type: String,
    pub quote_volume24h: Option<Decimal>,
    pub high_leverage_fee_exempt: bool,
    pub change1h: Option<Decimal>,
    pub change24h: Option<Decimal>,
    pub change_bod: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticker {
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub bid_size: Option<Decimal>,
    pub ask_size: Option<Decimal>,
    pub last: Option<Decimal>,
    pub time: Option<FtxTime>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: i64,
    #[serde(default)]
    pub liquidation: bool,
    pub price: Decimal,
    pub side: Side,
    pub size: Decimal,
    pub time: FtxTime,
}

/// Price levels are `(price, size)`, best first.
///
/// Every stream message carries a CRC32 `checksum` over the first 100 levels of each
/// side, interleaved as `bid_price:bid_size:ask_price:ask_size:...` with missing levels
/// omitted. A mismatch means the local book is stale and the caller should re-subscribe
/// to get a fresh `partial` snapshot. This crate does not maintain or verify books.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OrderBook {
    pub action: Option<String>,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
    pub checksum: u32,
    pub time: Option<FtxTime>,
}

// --- Account / Trading ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub id: i64,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub future: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub trade_id: Option<i64>,
    pub price: Decimal,
    pub side: Side,
    pub size: Decimal,
    pub fee: Decimal,
    #[serde(default)]
    pub fee_currency: Option<String>,
    pub fee_rate: Decimal,
    pub liquidity: Liquidity,
    pub time: FtxTime,
    #[serde(rename = "type", default)]
    pub fill_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub client_id: Option<String>,
    pub market: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub size: Decimal,
    #[serde(default)]
    pub filled_size: Decimal,
    #[serde(default)]
    pub remaining_size: Decimal,
    #[serde(default)]
    pub avg_fill_price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: FtxTime,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub ioc: bool,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub future: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub future: String,
    pub side: Option<Side>,
    pub size: Decimal,
    pub net_size: Decimal,
    pub cost: Decimal,
    pub entry_price: Option<Decimal>,
    pub estimated_liquidation_price: Option<Decimal>,
    pub initial_margin_requirement: Decimal,
    pub maintenance_margin_requirement: Decimal,
    pub long_order_size: Decimal,
    pub short_order_size: Decimal,
    pub open_size: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub collateral_used: Decimal,
    pub recent_average_open_price: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInformation {
    pub username: String,
    pub backstop_provider: bool,
    pub collateral: Decimal,
    pub free_collateral: Decimal,
    pub initial_margin_requirement: Decimal,
    pub maintenance_margin_requirement: Decimal,
    pub liquidating: bool,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
    pub margin_fraction: Option<Decimal>,
    pub open_margin_fraction: Option<Decimal>,
    pub total_account_value: Decimal,
    pub total_position_size: Decimal,
    pub leverage: Decimal,
    pub positions: Vec<Position>,
}

// --- Request Structs ---

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub market: String,
    pub side: Side,
    /// `None` for market orders; sent as `null`.
    pub price: Option<Decimal>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub size: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ioc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelAllOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_orders_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_orders_only: Option<bool>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetTradesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>, // Epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetOrdersHistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetFillsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// `"asc"` for oldest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Query of the candle endpoints (`/markets/{market}/candles`, `/indexes/{index}/candles`).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GetCandlesParams {
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl GetCandlesParams {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            limit: None,
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceTriggerOrderRequest {
    pub market: String,
    pub side: Side,
    pub size: Decimal,
    #[serde(rename = "type")]
    pub trigger_type: TriggerOrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_until_filled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Limit price once triggered; `None` sends a market order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_price: Option<Decimal>,
    /// Negative for sell orders, positive for buy orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_value: Option<Decimal>,
}

impl PlaceTriggerOrderRequest {
    /// Stop and take-profit orders need `trigger_price`; trailing stops need `trail_value`.
    pub fn validate(&self) -> Result<(), FtxError> {
        let missing = match self.trigger_type {
            TriggerOrderType::Stop | TriggerOrderType::TakeProfit
                if self.trigger_price.is_none() =>
            {
                Some("triggerPrice")
            }
            TriggerOrderType::TrailingStop if self.trail_value.is_none() => Some("trailValue"),
            _ => None,
        };
        match missing {
            Some(param) => Err(FtxError::ParameterRequiredError {
                param: param.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTriggerOrderRequest {
    pub size: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_value: Option<Decimal>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetTriggerOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<TriggerOrderType>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetTriggerOrdersHistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<TriggerOrderType>,
    #[serde(rename = "orderType", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `source` and `destination` are sub-account nicknames; `None` is the main account and
/// is sent as `null`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub coin: String,
    pub size: Decimal,
    pub source: Option<String>,
    pub destination: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WithdrawRequest {
    pub coin: String,
    pub size: Decimal,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Blockchain to use, for coins that live on several.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetFundingRatesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub from_coin: String,
    pub to_coin: String,
    pub size: Decimal,
}

// --- Markets (history) / Futures ---

/// One OHLCV bucket. Index candles carry no volume.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub start_time: FtxTime,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(default)]
    pub volume: Option<Decimal>,
}

/// A listed or expired future. The fields after `upper_bound` are only filled in by
/// `/expired_futures`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Future {
    pub name: String,
    pub underlying: String,
    pub description: String,
    #[serde(rename = "type")]
    pub future_type: String,
    pub enabled: bool,
    pub expired: bool,
    pub perpetual: bool,
    pub post_only: bool,
    pub expiry: Option<FtxTime>,
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub last: Option<Decimal>,
    pub mark: Option<Decimal>,
    pub index: Option<Decimal>,
    pub change1h: Option<Decimal>,
    pub change24h: Option<Decimal>,
    pub change_bod: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub volume_usd24h: Option<Decimal>,
    pub imf_factor: Option<Decimal>,
    pub position_limit_weight: Option<Decimal>,
    pub price_increment: Option<Decimal>,
    pub size_increment: Option<Decimal>,
    pub lower_bound: Option<Decimal>,
    pub upper_bound: Option<Decimal>,
    pub expiry_description: Option<String>,
    pub group: Option<String>,
    pub margin_price: Option<Decimal>,
    pub move_start: Option<String>,
    pub underlying_description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FutureStats {
    pub volume: Option<Decimal>,
    pub next_funding_rate: Option<Decimal>,
    pub next_funding_time: Option<FtxTime>,
    pub expiration_price: Option<Decimal>,
    pub predicted_expiration_price: Option<Decimal>,
    pub strike_price: Option<Decimal>,
    pub open_interest: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FundingRate {
    pub future: String,
    pub rate: Decimal,
    pub time: FtxTime,
}

// --- Conditional Orders ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOrder {
    pub id: i64,
    #[serde(default)]
    pub order_id: Option<i64>,
    pub market: String,
    #[serde(default)]
    pub future: Option<String>,
    #[serde(rename = "type")]
    pub trigger_type: TriggerOrderType,
    pub order_type: OrderType,
    pub side: Side,
    pub size: Decimal,
    pub status: TriggerOrderStatus,
    pub created_at: FtxTime,
    #[serde(default)]
    pub triggered_at: Option<FtxTime>,
    #[serde(default)]
    pub trigger_price: Option<Decimal>,
    #[serde(default)]
    pub order_price: Option<Decimal>,
    #[serde(default)]
    pub trail_start: Option<Decimal>,
    #[serde(default)]
    pub trail_value: Option<Decimal>,
    #[serde(default)]
    pub filled_size: Decimal,
    #[serde(default)]
    pub avg_fill_price: Option<Decimal>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub retry_until_filled: bool,
}

/// One firing of a conditional order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub time: FtxTime,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_size: Option<Decimal>,
    #[serde(default)]
    pub filled_size: Decimal,
    #[serde(default)]
    pub error: Option<String>,
}

// --- Sub-accounts / Wallet ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Subaccount {
    pub nickname: String,
    pub deletable: bool,
    pub editable: bool,
    pub competition: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin: String,
    pub free: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub usd_value: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transfer {
    pub id: i64,
    pub coin: String,
    pub size: Decimal,
    pub time: FtxTime,
    #[serde(default)]
    pub notes: String,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub id: i64,
    pub coin: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    pub size: Decimal,
    pub status: String,
    #[serde(default)]
    pub txid: Option<String>,
    pub time: FtxTime,
}

// --- Spot Margin ---

/// Estimated rate for the next hour and the rate of the previous one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpotMarginRate {
    pub coin: String,
    pub estimate: Decimal,
    pub previous: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BorrowSummary {
    pub coin: String,
    pub size: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpotMarginMarketInfo {
    pub coin: String,
    pub borrowed: Decimal,
    pub free: Decimal,
    pub estimated_rate: Decimal,
    pub previous_rate: Decimal,
}

/// Entry of the borrow and lending histories.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpotMarginHistory {
    pub coin: String,
    pub cost: Decimal,
    pub rate: Decimal,
    pub size: Decimal,
    pub time: FtxTime,
}

/// A lending offer, as listed and as submitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LendingOffer {
    pub coin: String,
    pub size: Decimal,
    pub rate: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LendingInfo {
    pub coin: String,
    pub lendable: Decimal,
    pub locked: Decimal,
    #[serde(default)]
    pub min_rate: Option<Decimal>,
    pub offered: Decimal,
}

// --- Converts ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStatus {
    pub id: i64,
    pub base_coin: String,
    pub quote_coin: String,
    pub from_coin: String,
    pub to_coin: String,
    pub side: Side,
    pub price: Decimal,
    pub cost: Decimal,
    pub proceeds: Decimal,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub expiry: Option<FtxTime>,
}

// --- Response Structs ---

/// Every REST response is wrapped as `{"success": bool, "result": T}` or
/// `{"success": false, "error": "..."}`.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub error: Option<String>,
}
