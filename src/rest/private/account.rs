//! Account data: balances, orders, trades, positions, ledgers, fees.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::formats::CommaSeparator;
use serde_with::{StringWithSeparator, serde_as, skip_serializing_none};

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::private;
use crate::rest::request::FormParams;
use crate::rest::response::KrakenResponse;
use crate::types::{BuySell, CloseTime, LedgerType, OrderStatus, OrderType};

/// `BalanceEx` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedBalance {
    pub balance: Decimal,
    #[serde(default)]
    pub credit: Option<Decimal>,
    #[serde(default)]
    pub credit_used: Option<Decimal>,
    /// Amount held by open orders.
    pub hold_trade: Decimal,
}

impl ExtendedBalance {
    /// Balance minus holds, plus unused credit.
    pub fn available(&self) -> Decimal {
        let credit = self.credit.unwrap_or_default() - self.credit_used.unwrap_or_default();
        self.balance + credit - self.hold_trade
    }
}

/// Parameters for `TradeBalance`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeBalanceRequest {
    /// Base asset for the figures (default `ZUSD`).
    pub asset: Option<String>,
}

/// `TradeBalance` result. Field names follow Kraken's abbreviations.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeBalance {
    /// Equivalent balance.
    pub eb: Decimal,
    /// Trade balance.
    pub tb: Decimal,
    /// Margin used by open positions.
    pub m: Decimal,
    /// Unrealized P&L of open positions.
    pub n: Decimal,
    /// Cost basis of open positions.
    pub c: Decimal,
    /// Valuation of open positions.
    pub v: Decimal,
    /// Equity.
    pub e: Decimal,
    /// Free margin.
    pub mf: Decimal,
    /// Margin level.
    #[serde(default)]
    pub ml: Option<Decimal>,
    /// Unexecuted value.
    #[serde(default)]
    pub uv: Option<Decimal>,
}

/// Parameters for `OpenOrders`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpenOrdersRequest {
    /// Include trade ids.
    pub trades: Option<bool>,
    pub userref: Option<i64>,
    pub cl_ord_id: Option<String>,
}

/// Parameters for `ClosedOrders`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClosedOrdersRequest {
    pub trades: Option<bool>,
    pub userref: Option<i64>,
    pub cl_ord_id: Option<String>,
    /// Unix timestamp or order id bound (exclusive).
    pub start: Option<String>,
    pub end: Option<String>,
    /// Result offset.
    pub ofs: Option<u32>,
    pub closetime: Option<CloseTime>,
}

/// Parameters for `QueryOrders`.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct QueryOrdersRequest {
    /// Up to 50 transaction ids.
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    pub txid: Vec<String>,
    pub trades: Option<bool>,
    pub userref: Option<i64>,
}

impl QueryOrdersRequest {
    pub fn new<I, S>(txids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            txid: txids.into_iter().map(Into::into).collect(),
            trades: None,
            userref: None,
        }
    }
}

/// How an order was described when it was placed.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDescription {
    pub pair: String,
    #[serde(rename = "type")]
    pub side: BuySell,
    pub ordertype: OrderType,
    pub price: Decimal,
    pub price2: Decimal,
    #[serde(default)]
    pub leverage: Option<String>,
    /// Human readable summary.
    pub order: String,
    #[serde(default)]
    pub close: Option<String>,
}

/// An order as returned by `OpenOrders`, `ClosedOrders` and `QueryOrders`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub refid: Option<String>,
    #[serde(default)]
    pub userref: Option<i64>,
    #[serde(default)]
    pub cl_ord_id: Option<String>,
    pub status: OrderStatus,
    pub opentm: f64,
    #[serde(default)]
    pub starttm: Option<f64>,
    #[serde(default)]
    pub expiretm: Option<f64>,
    #[serde(default)]
    pub closetm: Option<f64>,
    pub descr: OrderDescription,
    pub vol: Decimal,
    pub vol_exec: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    /// Average fill price.
    pub price: Decimal,
    #[serde(default)]
    pub stopprice: Option<Decimal>,
    #[serde(default)]
    pub limitprice: Option<Decimal>,
    #[serde(default)]
    pub misc: String,
    #[serde(default)]
    pub oflags: String,
    #[serde(default)]
    pub trades: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `OpenOrders` result.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrders {
    pub open: HashMap<String, Order>,
}

/// `ClosedOrders` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedOrders {
    pub closed: HashMap<String, Order>,
    /// Total matching orders (for paging with `ofs`).
    pub count: u32,
}

/// Parameters for `TradesHistory`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradesHistoryRequest {
    /// `all`, `any position`, `closed position`, `closing position` or `no position`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub trades: Option<bool>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub ofs: Option<u32>,
}

/// A private trade.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeInfo {
    pub ordertxid: String,
    #[serde(default)]
    pub postxid: Option<String>,
    pub pair: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub side: BuySell,
    pub ordertype: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    pub vol: Decimal,
    pub margin: Decimal,
    #[serde(default)]
    pub misc: String,
    #[serde(default)]
    pub maker: Option<bool>,
}

/// `TradesHistory` result.
#[derive(Debug, Clone, Deserialize)]
pub struct TradesHistory {
    pub trades: HashMap<String, TradeInfo>,
    pub count: u32,
}

/// Parameters for `OpenPositions`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpenPositionsRequest {
    /// Comma-delimited position ids.
    pub txid: Option<String>,
    /// Include profit/loss calculations.
    pub docalcs: Option<bool>,
}

/// An open margin position.
#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    pub ordertxid: String,
    pub posstatus: String,
    pub pair: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub side: BuySell,
    pub ordertype: String,
    pub cost: Decimal,
    pub fee: Decimal,
    pub vol: Decimal,
    pub vol_closed: Decimal,
    pub margin: Decimal,
    /// Present with `docalcs`.
    #[serde(default)]
    pub value: Option<Decimal>,
    /// Present with `docalcs`.
    #[serde(default)]
    pub net: Option<Decimal>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub rollovertm: Option<String>,
    #[serde(default)]
    pub misc: String,
    #[serde(default)]
    pub oflags: String,
}

/// Parameters for `Ledgers`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgersRequest {
    /// Comma-delimited assets.
    pub asset: Option<String>,
    pub aclass: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<LedgerType>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub ofs: Option<u32>,
    /// Skip the total count, which is slow for large accounts.
    pub without_count: Option<bool>,
}

/// Parameters for `QueryLedgers`.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct QueryLedgersRequest {
    /// Up to 20 ledger ids.
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    pub id: Vec<String>,
    pub trades: Option<bool>,
}

impl QueryLedgersRequest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: ids.into_iter().map(Into::into).collect(),
            trades: None,
        }
    }
}

/// A ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntry {
    pub refid: String,
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: LedgerType,
    #[serde(default)]
    pub subtype: String,
    pub aclass: String,
    pub asset: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub balance: Decimal,
}

/// `Ledgers` result.
#[derive(Debug, Clone, Deserialize)]
pub struct Ledgers {
    pub ledger: HashMap<String, LedgerEntry>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Parameters for `TradeVolume`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeVolumeRequest {
    /// Comma-delimited pairs to get fee tiers for.
    pub pair: Option<String>,
}

/// Fee tier information for one pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeInfo {
    pub fee: Decimal,
    #[serde(default)]
    pub minfee: Option<Decimal>,
    #[serde(default)]
    pub maxfee: Option<Decimal>,
    #[serde(default)]
    pub nextfee: Option<Decimal>,
    #[serde(default)]
    pub nextvolume: Option<Decimal>,
    #[serde(default)]
    pub tiervolume: Option<Decimal>,
}

/// `TradeVolume` result.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeVolume {
    pub currency: String,
    /// 30-day volume.
    pub volume: Decimal,
    #[serde(default)]
    pub fees: HashMap<String, FeeInfo>,
    #[serde(default)]
    pub fees_maker: HashMap<String, FeeInfo>,
}

impl SpotRestClient {
    /// Get the cash balance of every asset.
    pub async fn get_account_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<HashMap<String, Decimal>>, KrakenError> {
        self.call(ctx, &private::BALANCE, FormParams::empty(), security)
            .await
    }

    /// Get balances together with credit and amounts on hold.
    pub async fn get_extended_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<HashMap<String, ExtendedBalance>>, KrakenError> {
        self.call(ctx, &private::BALANCE_EX, FormParams::empty(), security)
            .await
    }

    /// Get margin account figures.
    pub async fn get_trade_balance(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeBalanceRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<TradeBalance>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::TRADE_BALANCE, params, security).await
    }

    pub async fn get_open_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<OpenOrders>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::OPEN_ORDERS, params, security).await
    }

    /// Get closed orders, 50 at a time.
    pub async fn get_closed_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&ClosedOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<ClosedOrders>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::CLOSED_ORDERS, params, security).await
    }

    /// Look up orders by transaction id.
    pub async fn query_orders(
        &self,
        ctx: &RequestContext,
        request: &QueryOrdersRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<HashMap<String, Order>>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::QUERY_ORDERS, params, security).await
    }

    /// Get the account's trades, 50 at a time.
    pub async fn get_trades_history(
        &self,
        ctx: &RequestContext,
        request: Option<&TradesHistoryRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<TradesHistory>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::TRADES_HISTORY, params, security).await
    }

    pub async fn get_open_positions(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenPositionsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<HashMap<String, Position>>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::OPEN_POSITIONS, params, security).await
    }

    /// Get ledger entries, 50 at a time.
    pub async fn get_ledgers(
        &self,
        ctx: &RequestContext,
        request: Option<&LedgersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Ledgers>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::LEDGERS, params, security).await
    }

    /// Look up ledger entries by id.
    pub async fn query_ledgers(
        &self,
        ctx: &RequestContext,
        request: &QueryLedgersRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<HashMap<String, LedgerEntry>>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::QUERY_LEDGERS, params, security).await
    }

    /// Get 30-day volume and fee tiers.
    pub async fn get_trade_volume(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeVolumeRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<TradeVolume>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::TRADE_VOLUME, params, security).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_orders_joins_txids() {
        let request = QueryOrdersRequest::new(["OQCLML-BW3P3-BUCMWZ", "OB5VMB-B4U2U-DK2WRW"]);
        let params = FormParams::encode(&request).unwrap();
        assert_eq!(
            params.as_str(),
            "txid=OQCLML-BW3P3-BUCMWZ%2COB5VMB-B4U2U-DK2WRW"
        );
    }

    #[test]
    fn test_ledger_filter_uses_type_key() {
        let request = LedgersRequest {
            asset: Some("XBT".into()),
            kind: Some(LedgerType::Deposit),
            ..Default::default()
        };
        let params = FormParams::encode(&request).unwrap();
        assert_eq!(params.as_str(), "asset=XBT&type=deposit");
    }

    #[test]
    fn test_extended_balance_available() {
        let json = r#"{"balance":"25.0","credit":"10.0","credit_used":"4.0","hold_trade":"5.0"}"#;
        let balance: ExtendedBalance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.available(), Decimal::new(26, 0));
    }

    #[test]
    fn test_order_deserializes() {
        let json = r#"{
            "refid": null,
            "userref": 0,
            "status": "open",
            "opentm": 1688666559.8974,
            "starttm": 0,
            "expiretm": 0,
            "descr": {
                "pair": "XBTUSD",
                "type": "buy",
                "ordertype": "limit",
                "price": "30010.0",
                "price2": "0",
                "leverage": "none",
                "order": "buy 1.25000000 XBTUSD @ limit 30010.0",
                "close": ""
            },
            "vol": "1.25000000",
            "vol_exec": "0.37500000",
            "cost": "11253.7",
            "fee": "0.00000",
            "price": "30010.0",
            "stopprice": "0.00000",
            "limitprice": "0.00000",
            "misc": "",
            "oflags": "fciq",
            "trades": ["TCCCTY-WE2O6-P3NB37"]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.descr.side, BuySell::Buy);
        assert_eq!(order.descr.ordertype, OrderType::Limit);
        assert_eq!(order.trades.len(), 1);
    }
}
