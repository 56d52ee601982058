//! Enumerations shared by request and response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuySell {
    Buy,
    Sell,
}

impl BuySell {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            BuySell::Buy => "buy",
            BuySell::Sell => "sell",
        }
    }
}

impl fmt::Display for BuySell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Market,
    Limit,
    Iceberg,
    StopLoss,
    TakeProfit,
    StopLossLimit,
    TakeProfitLimit,
    TrailingStop,
    TrailingStopLimit,
    SettlePosition,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Open,
    Closed,
    Canceled,
    Expired,
}

/// Time in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    #[serde(rename = "GTC")]
    GoodTillCancelled,
    /// Immediate or cancel.
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Good till date (requires `expiretm`).
    #[serde(rename = "GTD")]
    GoodTillDate,
}

/// Order flags, sent as a comma-delimited `oflags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderFlag {
    /// Post-only.
    Post,
    /// Fee in base currency.
    FeeInBase,
    /// Fee in quote currency.
    FeeInQuote,
    /// Disable market price protection.
    NoMarketPriceProtection,
    /// Volume expressed in quote currency.
    VolumeInQuote,
}

impl OrderFlag {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderFlag::Post => "post",
            OrderFlag::FeeInBase => "fcib",
            OrderFlag::FeeInQuote => "fciq",
            OrderFlag::NoMarketPriceProtection => "nompp",
            OrderFlag::VolumeInQuote => "viqc",
        }
    }
}

impl fmt::Display for OrderFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "post" => OrderFlag::Post,
            "fcib" => OrderFlag::FeeInBase,
            "fciq" => OrderFlag::FeeInQuote,
            "nompp" => OrderFlag::NoMarketPriceProtection,
            "viqc" => OrderFlag::VolumeInQuote,
            other => return Err(format!("unknown order flag {other:?}")),
        })
    }
}

/// Ledger entry type. Also used as a filter, where `All` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    All,
    Trade,
    Deposit,
    Withdrawal,
    Transfer,
    Margin,
    Adjustment,
    Rollover,
    Spend,
    Receive,
    Settled,
    Credit,
    Staking,
    Reward,
    Dividend,
    Sale,
    Conversion,
    #[serde(rename = "nfttrade")]
    NftTrade,
    #[serde(rename = "nftcreatorfee")]
    NftCreatorFee,
    #[serde(rename = "nftrebate")]
    NftRebate,
    #[serde(rename = "custodytransfer")]
    CustodyTransfer,
    /// Types added by Kraken after this list was written.
    #[serde(other)]
    Other,
}

/// Which timestamp `start`/`end` filter on for closed orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseTime {
    Open,
    Close,
    #[default]
    Both,
}

/// Candle width in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum OhlcInterval {
    Min1,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour4,
    Day1,
    Week1,
    Day15,
}

impl OhlcInterval {
    /// Width in minutes, as Kraken expects it.
    pub fn minutes(self) -> u32 {
        match self {
            OhlcInterval::Min1 => 1,
            OhlcInterval::Min5 => 5,
            OhlcInterval::Min15 => 15,
            OhlcInterval::Min30 => 30,
            OhlcInterval::Hour1 => 60,
            OhlcInterval::Hour4 => 240,
            OhlcInterval::Day1 => 1440,
            OhlcInterval::Week1 => 10080,
            OhlcInterval::Day15 => 21600,
        }
    }
}

impl From<OhlcInterval> for u32 {
    fn from(interval: OhlcInterval) -> u32 {
        interval.minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderType::StopLossLimit).unwrap(),
            r#""stop-loss-limit""#
        );
        assert_eq!(
            serde_json::from_str::<OrderType>(r#""limit""#).unwrap(),
            OrderType::Limit
        );
    }

    #[test]
    fn test_order_flag_round_trip_through_str() {
        for flag in [OrderFlag::Post, OrderFlag::FeeInQuote, OrderFlag::VolumeInQuote] {
            assert_eq!(flag.to_string().parse::<OrderFlag>().unwrap(), flag);
        }
        assert!("bogus".parse::<OrderFlag>().is_err());
    }

    #[test]
    fn test_unknown_ledger_type() {
        let parsed: LedgerType = serde_json::from_str(r#""earnings""#).unwrap();
        assert_eq!(parsed, LedgerType::Other);
    }

    #[test]
    fn test_ohlc_interval_query_value() {
        let query = serde_urlencoded::to_string([("interval", OhlcInterval::Hour4)]).unwrap();
        assert_eq!(query, "interval=240");
    }
}
