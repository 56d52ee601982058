//! Tracing decorator for any [`KrakenClient`].
//!
//! [`TracedClient`] wraps a client and runs every call inside a
//! `kraken.request` span carrying OpenTelemetry-style attributes:
//!
//! | attribute | value |
//! |---|---|
//! | `otel.name`, `rpc.method` | operation name, e.g. `AddOrder` |
//! | `otel.kind` | `client` |
//! | `rpc.system` | `kraken` |
//! | `kraken.private` | whether the call is signed |
//! | `kraken.pair`, `kraken.asset`, `kraken.txid`, `kraken.strategy_id`, `kraken.report` | request identifiers, when the call has one |
//! | `otel.status_code` | `OK` or `ERROR` |
//! | `error.type` | [`KrakenError::kind`] when the call itself failed |
//! | `kraken.api_errors` | the envelope's error array when Kraken rejected the call |
//!
//! A call can fail on the way (transport, status, decoding) or be rejected by
//! the exchange in a well-formed envelope. The two are recorded in separate
//! attributes and never conflated.
//!
//! ```rust,no_run
//! use kraken_rest_client::context::RequestContext;
//! use kraken_rest_client::instrument::TracedClient;
//! use kraken_rest_client::rest::{KrakenClient, SpotRestClient};
//!
//! # async fn run() -> Result<(), kraken_rest_client::error::KrakenError> {
//! let client = TracedClient::new(SpotRestClient::new()?);
//! let status = client
//!     .get_system_status(&RequestContext::background())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;

use rust_decimal::Decimal;
use tracing::field::Empty;
use tracing::{Instrument, Span, info_span};

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::endpoints::{Endpoint, private, public};
use crate::rest::private::{
    AddExportRequest, AddOrderRequest, AddOrderResponse, AllocationStatus,
    CancelAllOrdersAfter, CancelAllOrdersAfterRequest, CancelOrderRequest, CancelOrderResponse,
    ClosedOrders, ClosedOrdersRequest, DepositAddress, DepositAddressesRequest, DepositMethod,
    DepositMethodsRequest, EarnAllocateRequest, EarnAllocations, EarnAllocationsRequest,
    EarnStatusRequest, EarnStrategies, EarnStrategiesRequest, ExportId, ExportReport,
    ExportStatusRequest, ExtendedBalance, LedgerEntry, Ledgers, LedgersRequest, OpenOrders,
    OpenOrdersRequest, OpenPositionsRequest, Order, Position, QueryLedgersRequest,
    QueryOrdersRequest, ReferenceId, RemoveExportRequest, RemoveExportResult,
    RetrieveExportRequest, TradeBalance, TradeBalanceRequest, TradeVolume, TradeVolumeRequest,
    TradesHistory, TradesHistoryRequest, Transfer, TransferStatusRequest, WalletTransferRequest,
    WebSocketToken, WithdrawCancelRequest, WithdrawInfo, WithdrawInfoRequest, WithdrawRequest,
};
use crate::rest::public::{
    AssetInfo, AssetInfoRequest, AssetPair, AssetPairsRequest, OhlcData, OhlcRequest, OrderBook,
    OrderBookRequest, RecentSpreads, RecentSpreadsRequest, RecentTrades, RecentTradesRequest,
    ServerTime, SystemStatus, Tickers,
};
use crate::rest::{Decoded, Executed, KrakenClient, KrakenResponse, Reply};

/// A [`KrakenClient`] that traces every call of the client it wraps.
#[derive(Debug, Clone)]
pub struct TracedClient<C> {
    inner: C,
}

impl<C> TracedClient<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Unwrap.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

/// Open the span for one call to `endpoint`. Per-call and completion
/// attributes are declared empty and filled in later.
fn request_span(endpoint: &Endpoint) -> Span {
    info_span!(
        "kraken.request",
        otel.name = endpoint.name,
        otel.kind = "client",
        rpc.system = "kraken",
        rpc.method = endpoint.name,
        kraken.private = endpoint.is_private(),
        kraken.pair = Empty,
        kraken.asset = Empty,
        kraken.txid = Empty,
        kraken.strategy_id = Empty,
        kraken.report = Empty,
        otel.status_code = Empty,
        "error.type" = Empty,
        kraken.api_errors = Empty,
    )
}

/// How a call's outcome is written onto its span.
trait TraceOutcome {
    fn record_outcome(&self, span: &Span);
}

impl<T> TraceOutcome for Result<KrakenResponse<T>, KrakenError> {
    fn record_outcome(&self, span: &Span) {
        match self {
            Ok(envelope) => record_envelope(span, &envelope.error),
            Err(err) => record_error(span, err),
        }
    }
}

impl<T> TraceOutcome for Result<Executed<T>, KrakenError> {
    fn record_outcome(&self, span: &Span) {
        match self {
            Ok(Executed {
                body: Decoded::Json(envelope),
                ..
            }) => record_envelope(span, &envelope.error),
            Ok(_) => {
                span.record("otel.status_code", "OK");
            }
            Err(err) => record_error(span, err),
        }
    }
}

fn record_envelope(span: &Span, errors: &[String]) {
    if errors.is_empty() {
        span.record("otel.status_code", "OK");
    } else {
        span.record("otel.status_code", "ERROR");
        span.record("kraken.api_errors", errors.join("; ").as_str());
    }
}

fn record_error(span: &Span, err: &KrakenError) {
    span.record("otel.status_code", "ERROR");
    span.record("error.type", err.kind());
}

/// Run `future` inside `span` and record its outcome there.
async fn traced<F, R>(span: Span, future: F) -> R
where
    F: Future<Output = R>,
    R: TraceOutcome,
{
    let outcome = future.instrument(span.clone()).await;
    outcome.record_outcome(&span);
    outcome
}

impl<C: KrakenClient> KrakenClient for TracedClient<C> {
    // ========== Public Endpoints ==========

    async fn get_server_time(&self, ctx: &RequestContext) -> Reply<ServerTime> {
        let span = request_span(&public::TIME);
        traced(span, self.inner.get_server_time(ctx)).await
    }

    async fn get_system_status(&self, ctx: &RequestContext) -> Reply<SystemStatus> {
        let span = request_span(&public::SYSTEM_STATUS);
        traced(span, self.inner.get_system_status(ctx)).await
    }

    async fn get_assets(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetInfoRequest>,
    ) -> Reply<HashMap<String, AssetInfo>> {
        let span = request_span(&public::ASSETS);
        if let Some(value) = request.and_then(|r| r.asset.as_deref()) {
            span.record("kraken.asset", value);
        }
        traced(span, self.inner.get_assets(ctx, request)).await
    }

    async fn get_asset_pairs(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetPairsRequest>,
    ) -> Reply<HashMap<String, AssetPair>> {
        let span = request_span(&public::ASSET_PAIRS);
        traced(span, self.inner.get_asset_pairs(ctx, request)).await
    }

    async fn get_ticker(&self, ctx: &RequestContext, pair: &str) -> Reply<Tickers> {
        let span = request_span(&public::TICKER);
        span.record("kraken.pair", pair);
        traced(span, self.inner.get_ticker(ctx, pair)).await
    }

    async fn get_ohlc(&self, ctx: &RequestContext, request: &OhlcRequest) -> Reply<OhlcData> {
        let span = request_span(&public::OHLC);
        span.record("kraken.pair", request.pair.as_str());
        traced(span, self.inner.get_ohlc(ctx, request)).await
    }

    async fn get_order_book(
        &self,
        ctx: &RequestContext,
        request: &OrderBookRequest,
    ) -> Reply<HashMap<String, OrderBook>> {
        let span = request_span(&public::DEPTH);
        span.record("kraken.pair", request.pair.as_str());
        traced(span, self.inner.get_order_book(ctx, request)).await
    }

    async fn get_recent_trades(
        &self,
        ctx: &RequestContext,
        request: &RecentTradesRequest,
    ) -> Reply<RecentTrades> {
        let span = request_span(&public::TRADES);
        span.record("kraken.pair", request.pair.as_str());
        traced(span, self.inner.get_recent_trades(ctx, request)).await
    }

    async fn get_recent_spreads(
        &self,
        ctx: &RequestContext,
        request: &RecentSpreadsRequest,
    ) -> Reply<RecentSpreads> {
        let span = request_span(&public::SPREAD);
        span.record("kraken.pair", request.pair.as_str());
        traced(span, self.inner.get_recent_spreads(ctx, request)).await
    }

    // ========== Private Endpoints - Account ==========

    async fn get_account_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Decimal>> {
        let span = request_span(&private::BALANCE);
        traced(span, self.inner.get_account_balance(ctx, security)).await
    }

    async fn get_extended_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, ExtendedBalance>> {
        let span = request_span(&private::BALANCE_EX);
        traced(span, self.inner.get_extended_balance(ctx, security)).await
    }

    async fn get_trade_balance(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeBalanceRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradeBalance> {
        let span = request_span(&private::TRADE_BALANCE);
        traced(span, self.inner.get_trade_balance(ctx, request, security)).await
    }

    async fn get_open_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<OpenOrders> {
        let span = request_span(&private::OPEN_ORDERS);
        traced(span, self.inner.get_open_orders(ctx, request, security)).await
    }

    async fn get_closed_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&ClosedOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<ClosedOrders> {
        let span = request_span(&private::CLOSED_ORDERS);
        traced(span, self.inner.get_closed_orders(ctx, request, security)).await
    }

    async fn query_orders(
        &self,
        ctx: &RequestContext,
        request: &QueryOrdersRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Order>> {
        let span = request_span(&private::QUERY_ORDERS);
        span.record("kraken.txid", request.txid.join(",").as_str());
        traced(span, self.inner.query_orders(ctx, request, security)).await
    }

    async fn get_trades_history(
        &self,
        ctx: &RequestContext,
        request: Option<&TradesHistoryRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradesHistory> {
        let span = request_span(&private::TRADES_HISTORY);
        traced(span, self.inner.get_trades_history(ctx, request, security)).await
    }

    async fn get_open_positions(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenPositionsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Position>> {
        let span = request_span(&private::OPEN_POSITIONS);
        traced(span, self.inner.get_open_positions(ctx, request, security)).await
    }

    async fn get_ledgers(
        &self,
        ctx: &RequestContext,
        request: Option<&LedgersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Ledgers> {
        let span = request_span(&private::LEDGERS);
        traced(span, self.inner.get_ledgers(ctx, request, security)).await
    }

    async fn query_ledgers(
        &self,
        ctx: &RequestContext,
        request: &QueryLedgersRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, LedgerEntry>> {
        let span = request_span(&private::QUERY_LEDGERS);
        traced(span, self.inner.query_ledgers(ctx, request, security)).await
    }

    async fn get_trade_volume(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeVolumeRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradeVolume> {
        let span = request_span(&private::TRADE_VOLUME);
        traced(span, self.inner.get_trade_volume(ctx, request, security)).await
    }

    // ========== Private Endpoints - Data Export ==========

    async fn add_export(
        &self,
        ctx: &RequestContext,
        request: &AddExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ExportId> {
        let span = request_span(&private::ADD_EXPORT);
        span.record("kraken.report", request.report.as_str());
        traced(span, self.inner.add_export(ctx, request, security)).await
    }

    async fn get_export_status(
        &self,
        ctx: &RequestContext,
        request: &ExportStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<ExportReport>> {
        let span = request_span(&private::EXPORT_STATUS);
        span.record("kraken.report", request.report.as_str());
        traced(span, self.inner.get_export_status(ctx, request, security)).await
    }

    async fn retrieve_export(
        &self,
        ctx: &RequestContext,
        request: &RetrieveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<Executed<serde_json::Value>, KrakenError> {
        let span = request_span(&private::RETRIEVE_EXPORT);
        span.record("kraken.report", request.id.as_str());
        traced(span, self.inner.retrieve_export(ctx, request, security)).await
    }

    async fn remove_export(
        &self,
        ctx: &RequestContext,
        request: &RemoveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<RemoveExportResult> {
        let span = request_span(&private::REMOVE_EXPORT);
        span.record("kraken.report", request.id.as_str());
        traced(span, self.inner.remove_export(ctx, request, security)).await
    }

    // ========== Private Endpoints - Trading ==========

    async fn add_order(
        &self,
        ctx: &RequestContext,
        request: &AddOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AddOrderResponse> {
        let span = request_span(&private::ADD_ORDER);
        span.record("kraken.pair", request.pair.as_str());
        traced(span, self.inner.add_order(ctx, request, security)).await
    }

    async fn cancel_order(
        &self,
        ctx: &RequestContext,
        request: &CancelOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelOrderResponse> {
        let span = request_span(&private::CANCEL_ORDER);
        if let Some(value) = request.txid.as_deref() {
            span.record("kraken.txid", value);
        }
        traced(span, self.inner.cancel_order(ctx, request, security)).await
    }

    async fn cancel_all_orders(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelOrderResponse> {
        let span = request_span(&private::CANCEL_ALL);
        traced(span, self.inner.cancel_all_orders(ctx, security)).await
    }

    async fn cancel_all_orders_after(
        &self,
        ctx: &RequestContext,
        request: &CancelAllOrdersAfterRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelAllOrdersAfter> {
        let span = request_span(&private::CANCEL_ALL_ORDERS_AFTER);
        traced(span, self.inner.cancel_all_orders_after(ctx, request, security)).await
    }

    // ========== Private Endpoints - Funding ==========

    async fn get_deposit_methods(
        &self,
        ctx: &RequestContext,
        request: &DepositMethodsRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<DepositMethod>> {
        let span = request_span(&private::DEPOSIT_METHODS);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.get_deposit_methods(ctx, request, security)).await
    }

    async fn get_deposit_addresses(
        &self,
        ctx: &RequestContext,
        request: &DepositAddressesRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<DepositAddress>> {
        let span = request_span(&private::DEPOSIT_ADDRESSES);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.get_deposit_addresses(ctx, request, security)).await
    }

    async fn get_deposit_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<Transfer>> {
        let span = request_span(&private::DEPOSIT_STATUS);
        if let Some(value) = request.and_then(|r| r.asset.as_deref()) {
            span.record("kraken.asset", value);
        }
        traced(span, self.inner.get_deposit_status(ctx, request, security)).await
    }

    async fn get_withdraw_info(
        &self,
        ctx: &RequestContext,
        request: &WithdrawInfoRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<WithdrawInfo> {
        let span = request_span(&private::WITHDRAW_INFO);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.get_withdraw_info(ctx, request, security)).await
    }

    async fn withdraw(
        &self,
        ctx: &RequestContext,
        request: &WithdrawRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ReferenceId> {
        let span = request_span(&private::WITHDRAW);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.withdraw(ctx, request, security)).await
    }

    async fn get_withdraw_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<Transfer>> {
        let span = request_span(&private::WITHDRAW_STATUS);
        if let Some(value) = request.and_then(|r| r.asset.as_deref()) {
            span.record("kraken.asset", value);
        }
        traced(span, self.inner.get_withdraw_status(ctx, request, security)).await
    }

    async fn cancel_withdrawal(
        &self,
        ctx: &RequestContext,
        request: &WithdrawCancelRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        let span = request_span(&private::WITHDRAW_CANCEL);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.cancel_withdrawal(ctx, request, security)).await
    }

    async fn wallet_transfer(
        &self,
        ctx: &RequestContext,
        request: &WalletTransferRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ReferenceId> {
        let span = request_span(&private::WALLET_TRANSFER);
        span.record("kraken.asset", request.asset.as_str());
        traced(span, self.inner.wallet_transfer(ctx, request, security)).await
    }

    // ========== Private Endpoints - Earn ==========

    async fn allocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        let span = request_span(&private::EARN_ALLOCATE);
        span.record("kraken.strategy_id", request.strategy_id.as_str());
        traced(span, self.inner.allocate_earn_funds(ctx, request, security)).await
    }

    async fn deallocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        let span = request_span(&private::EARN_DEALLOCATE);
        span.record("kraken.strategy_id", request.strategy_id.as_str());
        traced(span, self.inner.deallocate_earn_funds(ctx, request, security)).await
    }

    async fn get_earn_allocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AllocationStatus> {
        let span = request_span(&private::EARN_ALLOCATE_STATUS);
        span.record("kraken.strategy_id", request.strategy_id.as_str());
        traced(span, self.inner.get_earn_allocation_status(ctx, request, security)).await
    }

    async fn get_earn_deallocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AllocationStatus> {
        let span = request_span(&private::EARN_DEALLOCATE_STATUS);
        span.record("kraken.strategy_id", request.strategy_id.as_str());
        traced(span, self.inner.get_earn_deallocation_status(ctx, request, security)).await
    }

    async fn list_earn_strategies(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnStrategiesRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<EarnStrategies> {
        let span = request_span(&private::EARN_STRATEGIES);
        traced(span, self.inner.list_earn_strategies(ctx, request, security)).await
    }

    async fn list_earn_allocations(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnAllocationsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<EarnAllocations> {
        let span = request_span(&private::EARN_ALLOCATIONS);
        traced(span, self.inner.list_earn_allocations(ctx, request, security)).await
    }

    // ========== Private Endpoints - WebSocket ==========

    async fn get_websocket_token(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<WebSocketToken> {
        let span = request_span(&private::GET_WEBSOCKETS_TOKEN);
        traced(span, self.inner.get_websocket_token(ctx, security)).await
    }
}
