//! Kraken REST API client implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Request;
use reqwest::header::HeaderValue;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{Authorizer, CredentialsProvider, IncreasingNonce, NonceProvider, SecurityOptions};
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::endpoints::{Endpoint, HttpMethod, KRAKEN_BASE_URL};
use crate::rest::executor::Executor;
use crate::rest::request::{FormParams, RequestFactory, RequestParts};
use crate::rest::response::{Executed, KrakenResponse};
use crate::rest::traits::{KrakenClient, Reply};
use crate::rest::transport::{HttpTransport, TransportConfig, default_transport};
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

/// The Kraken Spot REST API client.
///
/// Every endpoint method funnels through [`SpotRestClient::call`]: the
/// endpoint descriptor and encoded parameters go to the request builder
/// (signing private calls), the executor sends the request and decodes the
/// envelope. Transport and decoding failures are returned as `Err`; rejections
/// by the exchange arrive as a non-empty [`KrakenResponse::error`].
///
/// # Example
///
/// ```rust,no_run
/// use kraken_rest_client::context::RequestContext;
/// use kraken_rest_client::rest::SpotRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SpotRestClient::new()?;
///     let ctx = RequestContext::background();
///
///     let time = client.get_server_time(&ctx).await?.into_result()?;
///     println!("Server time: {}", time.unixtime);
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use kraken_rest_client::auth::StaticCredentials;
/// use kraken_rest_client::context::RequestContext;
/// use kraken_rest_client::rest::SpotRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_key", "c2VjcmV0"));
///     let client = SpotRestClient::builder().credentials(credentials).build()?;
///
///     let response = client
///         .get_account_balance(&RequestContext::background(), None)
///         .await?;
///     if let Some(err) = response.api_error() {
///         eprintln!("Kraken rejected the call: {err}");
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SpotRestClient {
    factory: RequestFactory,
    executor: Executor,
    nonce_provider: Arc<dyn NonceProvider>,
}

impl SpotRestClient {
    /// Create a client for public endpoints with default settings.
    pub fn new() -> Result<Self, KrakenError> {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> SpotRestClientBuilder {
        SpotRestClientBuilder::new()
    }

    /// Whether the client can sign private requests.
    pub fn has_credentials(&self) -> bool {
        self.factory.has_authorizer()
    }

    /// Assemble the request for `endpoint`.
    ///
    /// Private endpoints draw a fresh nonce from the nonce provider and are
    /// signed; public ones carry `params` in the query string.
    pub fn build_request(
        &self,
        ctx: &RequestContext,
        endpoint: &Endpoint,
        params: FormParams,
        security: Option<&SecurityOptions>,
    ) -> Result<Request, KrakenError> {
        let parts = match endpoint.method {
            HttpMethod::Get => RequestParts::get(endpoint.path, params),
            HttpMethod::Post => RequestParts::post(endpoint.path, params),
        };

        let parts = if endpoint.is_private() {
            if !self.factory.has_authorizer() {
                return Err(KrakenError::MissingCredentials);
            }
            parts.private(self.nonce_provider.next_nonce(), security)
        } else {
            parts
        };

        self.factory.build(ctx, parts)
    }

    /// Send a prepared request and decode the response.
    pub async fn execute<T>(&self, ctx: &RequestContext, request: Request) -> Result<Executed<T>, KrakenError>
    where
        T: DeserializeOwned,
    {
        self.executor.execute(ctx, request).await
    }

    /// Call a JSON endpoint.
    ///
    /// A binary body on a JSON endpoint is a protocol violation and fails with
    /// [`KrakenError::UnexpectedContentType`].
    pub async fn call<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &Endpoint,
        params: FormParams,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<T>, KrakenError>
    where
        T: DeserializeOwned,
    {
        debug!(endpoint = endpoint.name, "calling Kraken endpoint");
        let request = self.build_request(ctx, endpoint, params, security)?;
        self.execute::<T>(ctx, request).await?.into_json()
    }

    /// Call an endpoint that may answer with either JSON or a binary body.
    pub async fn call_raw<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &Endpoint,
        params: FormParams,
        security: Option<&SecurityOptions>,
    ) -> Result<Executed<T>, KrakenError>
    where
        T: DeserializeOwned,
    {
        debug!(endpoint = endpoint.name, "calling Kraken endpoint");
        let request = self.build_request(ctx, endpoint, params, security)?;
        self.execute(ctx, request).await
    }
}

impl std::fmt::Debug for SpotRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotRestClient")
            .field("base_url", &self.factory.base_url().as_str())
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Builder for [`SpotRestClient`].
pub struct SpotRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    transport_config: TransportConfig,
}

impl SpotRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: KRAKEN_BASE_URL.to_string(),
            credentials: None,
            nonce_provider: None,
            user_agent: None,
            transport: None,
            transport_config: TransportConfig::default(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom HTTP transport instead of the default middleware stack.
    ///
    /// `max_retries` and `timeout` only configure the default transport.
    pub fn transport(mut self, transport: impl HttpTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.transport_config.max_retries = retries;
        self
    }

    /// Set an overall per-request timeout on the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// Fails with [`KrakenError::Configuration`] for an invalid base URL or
    /// user agent, or for credentials whose secret is not valid base64.
    pub fn build(self) -> Result<SpotRestClient, KrakenError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| KrakenError::Configuration(format!("Invalid base URL {:?}: {e}", self.base_url)))?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("kraken-rest-client/{}", env!("CARGO_PKG_VERSION")));
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|_| KrakenError::Configuration(format!("Invalid user agent {user_agent:?}")))?;

        let authorizer = self
            .credentials
            .as_ref()
            .map(|provider| Authorizer::from_credentials(provider.get_credentials()))
            .transpose()?
            .map(Arc::new);

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(default_transport(&self.transport_config)?),
        };

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(IncreasingNonce::new()));

        Ok(SpotRestClient {
            factory: RequestFactory::new(base_url, user_agent, authorizer),
            executor: Executor::new(transport),
            nonce_provider,
        })
    }
}

impl Default for SpotRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// KrakenClient trait implementation.

impl KrakenClient for SpotRestClient {
    // ========== Public Endpoints ==========

    async fn get_server_time(&self, ctx: &RequestContext) -> Reply<ServerTime> {
        SpotRestClient::get_server_time(self, ctx).await
    }

    async fn get_system_status(&self, ctx: &RequestContext) -> Reply<SystemStatus> {
        SpotRestClient::get_system_status(self, ctx).await
    }

    async fn get_assets(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetInfoRequest>,
    ) -> Reply<HashMap<String, AssetInfo>> {
        SpotRestClient::get_assets(self, ctx, request).await
    }

    async fn get_asset_pairs(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetPairsRequest>,
    ) -> Reply<HashMap<String, AssetPair>> {
        SpotRestClient::get_asset_pairs(self, ctx, request).await
    }

    async fn get_ticker(&self, ctx: &RequestContext, pair: &str) -> Reply<Tickers> {
        SpotRestClient::get_ticker(self, ctx, pair).await
    }

    async fn get_ohlc(&self, ctx: &RequestContext, request: &OhlcRequest) -> Reply<OhlcData> {
        SpotRestClient::get_ohlc(self, ctx, request).await
    }

    async fn get_order_book(
        &self,
        ctx: &RequestContext,
        request: &OrderBookRequest,
    ) -> Reply<HashMap<String, OrderBook>> {
        SpotRestClient::get_order_book(self, ctx, request).await
    }

    async fn get_recent_trades(
        &self,
        ctx: &RequestContext,
        request: &RecentTradesRequest,
    ) -> Reply<RecentTrades> {
        SpotRestClient::get_recent_trades(self, ctx, request).await
    }

    async fn get_recent_spreads(
        &self,
        ctx: &RequestContext,
        request: &RecentSpreadsRequest,
    ) -> Reply<RecentSpreads> {
        SpotRestClient::get_recent_spreads(self, ctx, request).await
    }

    // ========== Private Endpoints - Account ==========

    async fn get_account_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Decimal>> {
        SpotRestClient::get_account_balance(self, ctx, security).await
    }

    async fn get_extended_balance(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, ExtendedBalance>> {
        SpotRestClient::get_extended_balance(self, ctx, security).await
    }

    async fn get_trade_balance(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeBalanceRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradeBalance> {
        SpotRestClient::get_trade_balance(self, ctx, request, security).await
    }

    async fn get_open_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<OpenOrders> {
        SpotRestClient::get_open_orders(self, ctx, request, security).await
    }

    async fn get_closed_orders(
        &self,
        ctx: &RequestContext,
        request: Option<&ClosedOrdersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<ClosedOrders> {
        SpotRestClient::get_closed_orders(self, ctx, request, security).await
    }

    async fn query_orders(
        &self,
        ctx: &RequestContext,
        request: &QueryOrdersRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Order>> {
        SpotRestClient::query_orders(self, ctx, request, security).await
    }

    async fn get_trades_history(
        &self,
        ctx: &RequestContext,
        request: Option<&TradesHistoryRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradesHistory> {
        SpotRestClient::get_trades_history(self, ctx, request, security).await
    }

    async fn get_open_positions(
        &self,
        ctx: &RequestContext,
        request: Option<&OpenPositionsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, Position>> {
        SpotRestClient::get_open_positions(self, ctx, request, security).await
    }

    async fn get_ledgers(
        &self,
        ctx: &RequestContext,
        request: Option<&LedgersRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Ledgers> {
        SpotRestClient::get_ledgers(self, ctx, request, security).await
    }

    async fn query_ledgers(
        &self,
        ctx: &RequestContext,
        request: &QueryLedgersRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<HashMap<String, LedgerEntry>> {
        SpotRestClient::query_ledgers(self, ctx, request, security).await
    }

    async fn get_trade_volume(
        &self,
        ctx: &RequestContext,
        request: Option<&TradeVolumeRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<TradeVolume> {
        SpotRestClient::get_trade_volume(self, ctx, request, security).await
    }

    // ========== Private Endpoints - Data Export ==========

    async fn add_export(
        &self,
        ctx: &RequestContext,
        request: &AddExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ExportId> {
        SpotRestClient::add_export(self, ctx, request, security).await
    }

    async fn get_export_status(
        &self,
        ctx: &RequestContext,
        request: &ExportStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<ExportReport>> {
        SpotRestClient::get_export_status(self, ctx, request, security).await
    }

    async fn retrieve_export(
        &self,
        ctx: &RequestContext,
        request: &RetrieveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<Executed<serde_json::Value>, KrakenError> {
        SpotRestClient::retrieve_export(self, ctx, request, security).await
    }

    async fn remove_export(
        &self,
        ctx: &RequestContext,
        request: &RemoveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<RemoveExportResult> {
        SpotRestClient::remove_export(self, ctx, request, security).await
    }

    // ========== Private Endpoints - Trading ==========

    async fn add_order(
        &self,
        ctx: &RequestContext,
        request: &AddOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AddOrderResponse> {
        SpotRestClient::add_order(self, ctx, request, security).await
    }

    async fn cancel_order(
        &self,
        ctx: &RequestContext,
        request: &CancelOrderRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelOrderResponse> {
        SpotRestClient::cancel_order(self, ctx, request, security).await
    }

    async fn cancel_all_orders(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelOrderResponse> {
        SpotRestClient::cancel_all_orders(self, ctx, security).await
    }

    async fn cancel_all_orders_after(
        &self,
        ctx: &RequestContext,
        request: &CancelAllOrdersAfterRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<CancelAllOrdersAfter> {
        SpotRestClient::cancel_all_orders_after(self, ctx, request, security).await
    }

    // ========== Private Endpoints - Funding ==========

    async fn get_deposit_methods(
        &self,
        ctx: &RequestContext,
        request: &DepositMethodsRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<DepositMethod>> {
        SpotRestClient::get_deposit_methods(self, ctx, request, security).await
    }

    async fn get_deposit_addresses(
        &self,
        ctx: &RequestContext,
        request: &DepositAddressesRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<DepositAddress>> {
        SpotRestClient::get_deposit_addresses(self, ctx, request, security).await
    }

    async fn get_deposit_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<Transfer>> {
        SpotRestClient::get_deposit_status(self, ctx, request, security).await
    }

    async fn get_withdraw_info(
        &self,
        ctx: &RequestContext,
        request: &WithdrawInfoRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<WithdrawInfo> {
        SpotRestClient::get_withdraw_info(self, ctx, request, security).await
    }

    async fn withdraw(
        &self,
        ctx: &RequestContext,
        request: &WithdrawRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ReferenceId> {
        SpotRestClient::withdraw(self, ctx, request, security).await
    }

    async fn get_withdraw_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<Vec<Transfer>> {
        SpotRestClient::get_withdraw_status(self, ctx, request, security).await
    }

    async fn cancel_withdrawal(
        &self,
        ctx: &RequestContext,
        request: &WithdrawCancelRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        SpotRestClient::cancel_withdrawal(self, ctx, request, security).await
    }

    async fn wallet_transfer(
        &self,
        ctx: &RequestContext,
        request: &WalletTransferRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<ReferenceId> {
        SpotRestClient::wallet_transfer(self, ctx, request, security).await
    }

    // ========== Private Endpoints - Earn ==========

    async fn allocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        SpotRestClient::allocate_earn_funds(self, ctx, request, security).await
    }

    async fn deallocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<bool> {
        SpotRestClient::deallocate_earn_funds(self, ctx, request, security).await
    }

    async fn get_earn_allocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AllocationStatus> {
        SpotRestClient::get_earn_allocation_status(self, ctx, request, security).await
    }

    async fn get_earn_deallocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Reply<AllocationStatus> {
        SpotRestClient::get_earn_deallocation_status(self, ctx, request, security).await
    }

    async fn list_earn_strategies(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnStrategiesRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<EarnStrategies> {
        SpotRestClient::list_earn_strategies(self, ctx, request, security).await
    }

    async fn list_earn_allocations(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnAllocationsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Reply<EarnAllocations> {
        SpotRestClient::list_earn_allocations(self, ctx, request, security).await
    }

    // ========== Private Endpoints - WebSocket ==========

    async fn get_websocket_token(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Reply<WebSocketToken> {
        SpotRestClient::get_websocket_token(self, ctx, security).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{API_SIGN_HEADER, CounterNonce, StaticCredentials};
    use crate::rest::endpoints::{private, public};
    use reqwest::header::USER_AGENT;

    fn private_client() -> SpotRestClient {
        SpotRestClient::builder()
            .credentials(Arc::new(StaticCredentials::new("key", "c2VjcmV0")))
            .nonce_provider(Arc::new(CounterNonce::starting_after(99)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_user_agent() {
        let client = SpotRestClient::new().unwrap();
        let request = client
            .build_request(&RequestContext::background(), &public::TIME, FormParams::empty(), None)
            .unwrap();
        let agent = request.headers()[USER_AGENT].to_str().unwrap();
        assert!(agent.starts_with("kraken-rest-client/"));
    }

    #[test]
    fn test_invalid_secret_fails_at_build() {
        let err = SpotRestClient::builder()
            .credentials(Arc::new(StaticCredentials::new("key", "%%%")))
            .build()
            .unwrap_err();
        assert!(matches!(err, KrakenError::Configuration(_)));
    }

    #[test]
    fn test_invalid_base_url_fails_at_build() {
        let err = SpotRestClient::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, KrakenError::Configuration(_)));
    }

    #[test]
    fn test_private_request_without_credentials() {
        let client = SpotRestClient::new().unwrap();
        let err = client
            .build_request(&RequestContext::background(), &private::BALANCE, FormParams::empty(), None)
            .unwrap_err();
        assert!(matches!(err, KrakenError::MissingCredentials));
    }

    #[test]
    fn test_private_requests_use_increasing_nonces() {
        let client = private_client();
        let ctx = RequestContext::background();

        let first = client
            .build_request(&ctx, &private::BALANCE, FormParams::empty(), None)
            .unwrap();
        let second = client
            .build_request(&ctx, &private::BALANCE, FormParams::empty(), None)
            .unwrap();

        let body = |r: &Request| String::from_utf8(r.body().unwrap().as_bytes().unwrap().to_vec()).unwrap();
        assert_eq!(body(&first), "nonce=100");
        assert_eq!(body(&second), "nonce=101");
        assert_ne!(first.headers()[API_SIGN_HEADER], second.headers()[API_SIGN_HEADER]);
    }
}
