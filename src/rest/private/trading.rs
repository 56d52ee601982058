//! Order placement and cancellation.

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
use crate::types::{BuySell, OrderFlag, OrderType, TimeInForce};

/// Parameters for `AddOrder`.
///
/// Fields are declared in the order they are encoded, so the form body for a
/// plain limit order reads `ordertype=..&pair=..&price=..&type=..&volume=..`.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct AddOrderRequest {
    pub ordertype: OrderType,
    pub pair: String,
    /// Limit price, or trigger price for conditional orders.
    pub price: Option<Decimal>,
    /// Secondary price for `*-limit` conditional orders.
    pub price2: Option<Decimal>,
    #[serde(rename = "type")]
    pub side: BuySell,
    /// Order volume in base currency (quote with `viqc`).
    pub volume: Decimal,
    pub userref: Option<i32>,
    pub cl_ord_id: Option<String>,
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, OrderFlag>>")]
    pub oflags: Option<Vec<OrderFlag>>,
    pub timeinforce: Option<TimeInForce>,
    /// `0`, `+<n>` or a Unix timestamp.
    pub starttm: Option<String>,
    pub expiretm: Option<String>,
    pub leverage: Option<String>,
    pub reduce_only: Option<bool>,
    /// Validate only; nothing is submitted.
    pub validate: Option<bool>,
}

impl AddOrderRequest {
    fn with(ordertype: OrderType, side: BuySell, pair: impl Into<String>, volume: Decimal) -> Self {
        Self {
            ordertype,
            pair: pair.into(),
            price: None,
            price2: None,
            side,
            volume,
            userref: None,
            cl_ord_id: None,
            oflags: None,
            timeinforce: None,
            starttm: None,
            expiretm: None,
            leverage: None,
            reduce_only: None,
            validate: None,
        }
    }

    /// A market order.
    pub fn market(side: BuySell, pair: impl Into<String>, volume: Decimal) -> Self {
        Self::with(OrderType::Market, side, pair, volume)
    }

    /// A limit order.
    pub fn limit(side: BuySell, pair: impl Into<String>, volume: Decimal, price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Self::with(OrderType::Limit, side, pair, volume)
        }
    }

    pub fn flags(mut self, flags: impl IntoIterator<Item = OrderFlag>) -> Self {
        self.oflags = Some(flags.into_iter().collect());
        self
    }

    pub fn time_in_force(mut self, tif: TimeInForce) -> Self {
        self.timeinforce = Some(tif);
        self
    }

    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.cl_ord_id = Some(id.into());
        self
    }

    /// Ask Kraken to validate the order without placing it.
    pub fn validate_only(mut self) -> Self {
        self.validate = Some(true);
        self
    }
}

/// Summary Kraken returns for a placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderDescription {
    pub order: String,
    #[serde(default)]
    pub close: Option<String>,
}

/// `AddOrder` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderResponse {
    pub descr: AddOrderDescription,
    /// Empty when the order was only validated.
    #[serde(default)]
    pub txid: Vec<String>,
}

/// Parameters for `CancelOrder`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest {
    /// Transaction id or user reference.
    pub txid: Option<String>,
    pub cl_ord_id: Option<String>,
}

impl CancelOrderRequest {
    pub fn txid(txid: impl Into<String>) -> Self {
        Self {
            txid: Some(txid.into()),
            cl_ord_id: None,
        }
    }

    pub fn client_order_id(id: impl Into<String>) -> Self {
        Self {
            txid: None,
            cl_ord_id: Some(id.into()),
        }
    }
}

/// `CancelOrder` / `CancelAll` result.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResponse {
    /// Number of orders cancelled.
    pub count: u32,
    #[serde(default)]
    pub pending: Option<bool>,
}

/// Parameters for `CancelAllOrdersAfter`.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAllOrdersAfterRequest {
    /// Seconds until all orders are cancelled; `0` disarms the timer.
    pub timeout: u32,
}

/// `CancelAllOrdersAfter` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAllOrdersAfter {
    pub current_time: String,
    pub trigger_time: String,
}

impl SpotRestClient {
    /// Place an order.
    pub async fn add_order(
        &self,
        ctx: &RequestContext,
        request: &AddOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<AddOrderResponse>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::ADD_ORDER, params, security).await
    }

    /// Cancel one order.
    pub async fn cancel_order(
        &self,
        ctx: &RequestContext,
        request: &CancelOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<CancelOrderResponse>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::CANCEL_ORDER, params, security).await
    }

    /// Cancel every open order.
    pub async fn cancel_all_orders(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<CancelOrderResponse>, KrakenError> {
        self.call(ctx, &private::CANCEL_ALL, FormParams::empty(), security)
            .await
    }

    /// Arm (or with `timeout = 0`, disarm) the dead man's switch.
    pub async fn cancel_all_orders_after(
        &self,
        ctx: &RequestContext,
        request: &CancelAllOrdersAfterRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<CancelAllOrdersAfter>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::CANCEL_ALL_ORDERS_AFTER, params, security)
            .await
    }
}
