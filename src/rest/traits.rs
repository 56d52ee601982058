//! Trait definition for the Kraken REST API client.
//!
//! [`KrakenClient`] abstracts every REST operation so callers can depend on
//! the capability rather than on [`SpotRestClient`](crate::rest::SpotRestClient).
//! This enables mock implementations in tests and decorators such as
//! [`TracedClient`](crate::instrument::TracedClient).
//!
//! Every operation takes a [`RequestContext`] bounding its lifetime. Private
//! operations also take optional [`SecurityOptions`]. JSON operations return
//! the full [`KrakenResponse`] envelope: the outer `Result` reports transport
//! and decoding failures, the envelope's `error` array reports what Kraken
//! rejected.

use std::collections::HashMap;
use std::future::Future;

use rust_decimal::Decimal;

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
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
use crate::rest::response::{Executed, KrakenResponse};

/// Shorthand for the outcome of a JSON operation.
pub type Reply<T> = Result<KrakenResponse<T>, KrakenError>;

/// Trait defining all Kraken REST API operations.
pub trait KrakenClient: Send + Sync {
    // ========== Public Endpoints ==========

    /// Get the server time.
    fn get_server_time(&self, ctx: &RequestContext) -> impl Future<Output = Reply<ServerTime>> + Send;

    /// Get the exchange operating state.
    fn get_system_status(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = Reply<SystemStatus>> + Send;

    /// Get asset information.
    fn get_assets(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetInfoRequest>,
    ) -> impl Future<Output = Reply<HashMap<String, AssetInfo>>> + Send;

    /// Get tradable asset pairs.
    fn get_asset_pairs(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetPairsRequest>,
    ) -> impl Future<Output = Reply<HashMap<String, AssetPair>>> + Send;

    /// Get ticker information for a comma-delimited list of pairs.
    fn get_ticker(
        &self,
        ctx: &RequestContext,
        pair: &str,
    ) -> impl Future<Output = Reply<Tickers>> + Send;

    /// Get OHLC candles.
    fn get_ohlc(
        &self,
        ctx: &RequestContext,
        request: &OhlcRequest,
    ) -> impl Future<Output = Reply<OhlcData>> + Send;

    /// Get the order book for a pair.
    fn get_order_book(
        &self,
        ctx: &RequestContext,
        request: &OrderBookRequest,
    ) -> impl Future<Output = Reply<HashMap<String, OrderBook>>> + Send;

    /// Get recent public trades.
    fn get_recent_trades(
        &self,
        ctx: &RequestContext,
        request: &RecentTradesRequest,
    ) -> impl Future<Output = Reply<RecentTrades>> + Send;

    /// Get recent spreads.
    fn get_recent_spreads(
        &self,
        ctx: &RequestContext,
        request: &RecentSpreadsRequest,
    ) -> impl Future<Output = Reply<RecentSpreads>> + Send;

    // ========== Private Endpoints - Account ==========

    /// Get the cash balance of every asset.
    fn get_account_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<HashMap<String, Decimal>>> + Send;

    /// Get balances with credit and held amounts.
    fn get_extended_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<HashMap<String, ExtendedBalance>>> + Send;

    /// Get margin account figures.
    fn get_trade_balance(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeBalanceRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<TradeBalance>> + Send;

    /// Get open orders.
    fn get_open_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<OpenOrders>> + Send;

    /// Get closed orders.
    fn get_closed_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&ClosedOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<ClosedOrders>> + Send;

    /// Query orders by transaction id.
    fn query_orders(
        &self,
        ctx: &RequestContext,
        request: &QueryOrdersRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<HashMap<String, Order>>> + Send;

    /// Get the account's trade history.
    fn get_trades_history(
        &self,
        ctx: &RequestContext,
        request: Option<&TradesHistoryRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<TradesHistory>> + Send;

    /// Get open margin positions.
    fn get_open_positions(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenPositionsRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<HashMap<String, Position>>> + Send;

    /// Get ledger entries.
    fn get_ledgers(
        &self,
        ctx: &RequestContext,
        request: Option<&LedgersRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Ledgers>> + Send;

    /// Query ledger entries by id.
    fn query_ledgers(
        &self,
        ctx: &RequestContext,
        request: &QueryLedgersRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<HashMap<String, LedgerEntry>>> + Send;

    /// Get 30-day volume and fee tiers.
    fn get_trade_volume(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeVolumeRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<TradeVolume>> + Send;

    // ========== Private Endpoints - Data Export ==========

    /// Queue a report export.
    fn add_export(
        &self,
        ctx: &RequestContext,
        request: &AddExportRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<ExportId>> + Send;

    /// List exports of one kind.
    fn get_export_status(
        &self,
        ctx: &RequestContext,
        request: &ExportStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Vec<ExportReport>>> + Send;

    /// Download a processed export as a byte stream.
    fn retrieve_export(
        &self,
        ctx: &RequestContext,
        request: &RetrieveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Result<Executed<serde_json::Value>, KrakenError>> + Send;

    /// Cancel or delete an export.
    fn remove_export(
        &self,
        ctx: &RequestContext,
        request: &RemoveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<RemoveExportResult>> + Send;

    // ========== Private Endpoints - Trading ==========

    /// Place an order.
    fn add_order(
        &self,
        ctx: &RequestContext,
        request: &AddOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<AddOrderResponse>> + Send;

    /// Cancel one order.
    fn cancel_order(
        &self,
        ctx: &RequestContext,
        request: &CancelOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<CancelOrderResponse>> + Send;

    /// Cancel every open order.
    fn cancel_all_orders(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<CancelOrderResponse>> + Send;

    /// Arm or disarm the dead man's switch.
    fn cancel_all_orders_after(
        &self,
        ctx: &RequestContext,
        request: &CancelAllOrdersAfterRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<CancelAllOrdersAfter>> + Send;

    // ========== Private Endpoints - Funding ==========

    /// Get funding methods for an asset.
    fn get_deposit_methods(
        &self,
        ctx: &RequestContext,
        request: &DepositMethodsRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Vec<DepositMethod>>> + Send;

    /// Get or generate deposit addresses.
    fn get_deposit_addresses(
        &self,
        ctx: &RequestContext,
        request: &DepositAddressesRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Vec<DepositAddress>>> + Send;

    /// Get recent deposits.
    fn get_deposit_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Vec<Transfer>>> + Send;

    /// Quote a withdrawal.
    fn get_withdraw_info(
        &self,
        ctx: &RequestContext,
        request: &WithdrawInfoRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<WithdrawInfo>> + Send;

    /// Withdraw funds.
    fn withdraw(
        &self,
        ctx: &RequestContext,
        request: &WithdrawRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<ReferenceId>> + Send;

    /// Get recent withdrawals.
    fn get_withdraw_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<Vec<Transfer>>> + Send;

    /// Cancel a pending withdrawal.
    fn cancel_withdrawal(
        &self,
        ctx: &RequestContext,
        request: &WithdrawCancelRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<bool>> + Send;

    /// Move funds between wallets.
    fn wallet_transfer(
        &self,
        ctx: &RequestContext,
        request: &WalletTransferRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<ReferenceId>> + Send;

    // ========== Private Endpoints - Earn ==========

    /// Allocate funds to a strategy.
    fn allocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<bool>> + Send;

    /// Deallocate funds from a strategy.
    fn deallocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<bool>> + Send;

    /// Status of the last allocation.
    fn get_earn_allocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<AllocationStatus>> + Send;

    /// Status of the last deallocation.
    fn get_earn_deallocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<AllocationStatus>> + Send;

    /// List earn strategies.
    fn list_earn_strategies(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnStrategiesRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<EarnStrategies>> + Send;

    /// List earn allocations.
    fn list_earn_allocations(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnAllocationsRequest>,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<EarnAllocations>> + Send;

    // ========== Private Endpoints - WebSocket ==========

    /// Get a WebSocket authentication token.
    fn get_websocket_token(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> impl Future<Output = Reply<WebSocketToken>> + Send;
}
