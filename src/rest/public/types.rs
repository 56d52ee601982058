//! Request and response types for market data endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::types::{OhlcInterval, PairSeries};

/// `Time` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp in seconds.
    pub unixtime: i64,
    /// The same instant in RFC 1123 format.
    pub rfc1123: String,
}

/// Exchange operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemState {
    Online,
    Maintenance,
    CancelOnly,
    PostOnly,
    #[serde(other)]
    Unknown,
}

/// `SystemStatus` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    pub status: SystemState,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Filters for `Assets`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetInfoRequest {
    /// Comma-delimited asset list.
    pub asset: Option<String>,
    /// Asset class (`currency` by default).
    pub aclass: Option<String>,
}

impl AssetInfoRequest {
    /// Restrict the result to the given comma-delimited assets.
    pub fn assets(assets: impl Into<String>) -> Self {
        Self {
            asset: Some(assets.into()),
            ..Self::default()
        }
    }
}

/// One entry of the `Assets` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    pub aclass: String,
    pub altname: String,
    /// Precision used for record keeping.
    pub decimals: u32,
    /// Precision used for display.
    pub display_decimals: u32,
    /// Sent as a bare JSON number.
    #[serde(default)]
    pub collateral_value: Option<serde_json::Number>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Level of detail for `AssetPairs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetPairDetail {
    Info,
    Leverage,
    Fees,
    Margin,
}

/// Filters for `AssetPairs`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetPairsRequest {
    /// Comma-delimited pair list.
    pub pair: Option<String>,
    pub info: Option<AssetPairDetail>,
    /// Filter by country code.
    pub country_code: Option<String>,
}

impl AssetPairsRequest {
    /// Restrict the result to the given comma-delimited pairs.
    pub fn pairs(pairs: impl Into<String>) -> Self {
        Self {
            pair: Some(pairs.into()),
            ..Self::default()
        }
    }
}

/// One entry of the `AssetPairs` result.
///
/// Fields outside the `info` detail level are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPair {
    pub altname: String,
    #[serde(default)]
    pub wsname: Option<String>,
    pub aclass_base: String,
    pub base: String,
    pub aclass_quote: String,
    pub quote: String,
    pub pair_decimals: u32,
    pub cost_decimals: u32,
    pub lot_decimals: u32,
    pub lot_multiplier: u32,
    #[serde(default)]
    pub leverage_buy: Vec<u32>,
    #[serde(default)]
    pub leverage_sell: Vec<u32>,
    /// Taker fee schedule.
    #[serde(default)]
    pub fees: Vec<FeeTier>,
    /// Maker fee schedule.
    #[serde(default)]
    pub fees_maker: Vec<FeeTier>,
    #[serde(default)]
    pub fee_volume_currency: Option<String>,
    #[serde(default)]
    pub ordermin: Option<Decimal>,
    #[serde(default)]
    pub costmin: Option<Decimal>,
    #[serde(default)]
    pub tick_size: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A fee schedule step, sent as `[volume, percent]` with bare JSON numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeTier {
    pub volume: serde_json::Number,
    pub percent: serde_json::Number,
}

impl FeeTier {
    /// The fee percentage as a decimal.
    pub fn percent_decimal(&self) -> Option<Decimal> {
        self.percent.to_string().parse().ok()
    }
}

/// One entry of the `Ticker` result.
///
/// Kraken packs the values into short arrays; the accessors pick the usual
/// elements out.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    /// Ask `[price, whole lot volume, lot volume]`.
    pub a: Vec<Decimal>,
    /// Bid `[price, whole lot volume, lot volume]`.
    pub b: Vec<Decimal>,
    /// Last trade `[price, lot volume]`.
    pub c: Vec<Decimal>,
    /// Volume `[today, last 24 hours]`.
    pub v: Vec<Decimal>,
    /// VWAP `[today, last 24 hours]`.
    pub p: Vec<Decimal>,
    /// Trade count `[today, last 24 hours]`.
    pub t: Vec<u64>,
    /// Low `[today, last 24 hours]`.
    pub l: Vec<Decimal>,
    /// High `[today, last 24 hours]`.
    pub h: Vec<Decimal>,
    /// Opening price today.
    pub o: Decimal,
}

impl TickerInfo {
    pub fn best_ask(&self) -> Option<Decimal> {
        self.a.first().copied()
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.b.first().copied()
    }

    pub fn last_trade(&self) -> Option<Decimal> {
        self.c.first().copied()
    }

    /// Rolling 24 hour volume.
    pub fn volume_24h(&self) -> Option<Decimal> {
        self.v.get(1).copied()
    }
}

/// Parameters for `OHLC`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct OhlcRequest {
    pub pair: String,
    pub interval: Option<OhlcInterval>,
    /// Cursor from a previous response.
    pub since: Option<String>,
}

impl OhlcRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            interval: None,
            since: None,
        }
    }

    pub fn interval(mut self, interval: OhlcInterval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn since(mut self, cursor: impl Into<String>) -> Self {
        self.since = Some(cursor.into());
        self
    }
}

/// One candle, sent as `[time, open, high, low, close, vwap, volume, count]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
    pub count: u64,
}

/// `OHLC` result.
pub type OhlcData = PairSeries<Vec<Candle>>;

/// Parameters for `Depth`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookRequest {
    pub pair: String,
    /// Levels per side, 1 to 500.
    pub count: Option<u16>,
}

impl OrderBookRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            count: None,
        }
    }

    /// Set the depth; values above 500 are clamped.
    pub fn count(mut self, count: u16) -> Self {
        self.count = Some(count.clamp(1, 500));
        self
    }
}

/// One price level, sent as `[price, volume, timestamp]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: i64,
}

/// One entry of the `Depth` result.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    pub asks: Vec<BookLevel>,
    pub bids: Vec<BookLevel>,
}

/// Parameters for `Trades`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct RecentTradesRequest {
    pub pair: String,
    /// Cursor from a previous response.
    pub since: Option<String>,
    /// At most this many trades (up to 1000).
    pub count: Option<u16>,
}

impl RecentTradesRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            since: None,
            count: None,
        }
    }

    pub fn since(mut self, cursor: impl Into<String>) -> Self {
        self.since = Some(cursor.into());
        self
    }

    pub fn count(mut self, count: u16) -> Self {
        self.count = Some(count);
        self
    }
}

/// One public trade, sent as
/// `[price, volume, time, side, type, misc, trade_id]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicTrade {
    pub price: Decimal,
    pub volume: Decimal,
    /// Unix time with fractional seconds.
    pub time: f64,
    /// `b` or `s`.
    pub side: String,
    /// `m` (market) or `l` (limit).
    pub order_type: String,
    pub misc: String,
    #[serde(default)]
    pub trade_id: Option<u64>,
}

/// `Trades` result.
pub type RecentTrades = PairSeries<Vec<PublicTrade>>;

/// Parameters for `Spread`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct RecentSpreadsRequest {
    pub pair: String,
    /// Cursor from a previous response.
    pub since: Option<String>,
}

impl RecentSpreadsRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            since: None,
        }
    }

    pub fn since(mut self, cursor: impl Into<String>) -> Self {
        self.since = Some(cursor.into());
        self
    }
}

/// One spread sample, sent as `[time, bid, ask]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadSample {
    pub time: i64,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// `Spread` result.
pub type RecentSpreads = PairSeries<Vec<SpreadSample>>;

/// `Ticker` result.
pub type Tickers = HashMap<String, TickerInfo>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::request::FormParams;

    #[test]
    fn test_candle_from_array() {
        let json = r#"[1688671200, "30306.1", "30306.2", "30305.7", "30305.7", "30306.1", "3.39243896", 23]"#;
        let candle: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(candle.time, 1_688_671_200);
        assert_eq!(candle.close.to_string(), "30305.7");
        assert_eq!(candle.count, 23);
    }

    #[test]
    fn test_public_trade_without_id() {
        let json = r#"["30243.40000", "0.34507674", 1688669597.8277369, "b", "m", ""]"#;
        let trade: PublicTrade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.side, "b");
        assert!(trade.trade_id.is_none());
    }

    #[test]
    fn test_optional_params_are_omitted() {
        let params = FormParams::encode(&OhlcRequest::new("XBTUSD").interval(OhlcInterval::Min5)).unwrap();
        assert_eq!(params.as_str(), "pair=XBTUSD&interval=5");

        let params = FormParams::encode(&AssetPairsRequest::default()).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_ticker_accessors() {
        let json = r#"{
            "a": ["30300.10000", "1", "1.000"],
            "b": ["30300.00000", "1", "1.000"],
            "c": ["30303.20000", "0.00067643"],
            "v": ["4083.67001100", "4412.73601799"],
            "p": ["30706.77771", "30689.13205"],
            "t": [34619, 38907],
            "l": ["29868.30000", "29868.30000"],
            "h": ["31631.00000", "31631.00000"],
            "o": "30502.80000"
        }"#;
        let ticker: TickerInfo = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.best_ask().unwrap().to_string(), "30300.10000");
        assert_eq!(ticker.volume_24h().unwrap().to_string(), "4412.73601799");
    }
}
