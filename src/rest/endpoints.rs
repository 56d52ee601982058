//! Kraken REST API endpoint table.
//!
//! Each operation is described once, declaratively: its name, its path below
//! the API version segment, the HTTP method and whether it must be signed.
//! The generic call helper on [`SpotRestClient`](crate::rest::SpotRestClient)
//! turns a descriptor plus parameters into a request.

/// Base URL for the Kraken REST API.
pub const KRAKEN_BASE_URL: &str = "https://api.kraken.com";

/// Version segment the request builder prefixes to every path.
pub const API_VERSION: &str = "0";

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// The method token as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Whether an endpoint needs a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

/// Declarative description of one REST operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Operation name as Kraken documents it (e.g. `AddOrder`).
    pub name: &'static str,
    /// Path below the version segment (e.g. `/private/AddOrder`).
    pub path: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Public or private.
    pub access: Access,
}

impl Endpoint {
    const fn public(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            method: HttpMethod::Get,
            access: Access::Public,
        }
    }

    const fn private(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            method: HttpMethod::Post,
            access: Access::Private,
        }
    }

    /// Whether requests to this endpoint are signed.
    pub const fn is_private(&self) -> bool {
        matches!(self.access, Access::Private)
    }
}

/// Public endpoints (no authentication required).
pub mod public {
    use super::Endpoint;

    pub const TIME: Endpoint = Endpoint::public("Time", "/public/Time");
    pub const SYSTEM_STATUS: Endpoint = Endpoint::public("SystemStatus", "/public/SystemStatus");
    pub const ASSETS: Endpoint = Endpoint::public("Assets", "/public/Assets");
    pub const ASSET_PAIRS: Endpoint = Endpoint::public("AssetPairs", "/public/AssetPairs");
    pub const TICKER: Endpoint = Endpoint::public("Ticker", "/public/Ticker");
    pub const OHLC: Endpoint = Endpoint::public("OHLC", "/public/OHLC");
    pub const DEPTH: Endpoint = Endpoint::public("Depth", "/public/Depth");
    pub const TRADES: Endpoint = Endpoint::public("Trades", "/public/Trades");
    pub const SPREAD: Endpoint = Endpoint::public("Spread", "/public/Spread");
}

/// Private endpoints (authentication required).
pub mod private {
    use super::Endpoint;

    // Account
    pub const BALANCE: Endpoint = Endpoint::private("Balance", "/private/Balance");
    pub const BALANCE_EX: Endpoint = Endpoint::private("BalanceEx", "/private/BalanceEx");
    pub const TRADE_BALANCE: Endpoint = Endpoint::private("TradeBalance", "/private/TradeBalance");
    pub const OPEN_ORDERS: Endpoint = Endpoint::private("OpenOrders", "/private/OpenOrders");
    pub const CLOSED_ORDERS: Endpoint = Endpoint::private("ClosedOrders", "/private/ClosedOrders");
    pub const QUERY_ORDERS: Endpoint = Endpoint::private("QueryOrders", "/private/QueryOrders");
    pub const TRADES_HISTORY: Endpoint =
        Endpoint::private("TradesHistory", "/private/TradesHistory");
    pub const OPEN_POSITIONS: Endpoint =
        Endpoint::private("OpenPositions", "/private/OpenPositions");
    pub const LEDGERS: Endpoint = Endpoint::private("Ledgers", "/private/Ledgers");
    pub const QUERY_LEDGERS: Endpoint = Endpoint::private("QueryLedgers", "/private/QueryLedgers");
    pub const TRADE_VOLUME: Endpoint = Endpoint::private("TradeVolume", "/private/TradeVolume");

    // Data export
    pub const ADD_EXPORT: Endpoint = Endpoint::private("AddExport", "/private/AddExport");
    pub const EXPORT_STATUS: Endpoint = Endpoint::private("ExportStatus", "/private/ExportStatus");
    pub const RETRIEVE_EXPORT: Endpoint =
        Endpoint::private("RetrieveExport", "/private/RetrieveExport");
    pub const REMOVE_EXPORT: Endpoint = Endpoint::private("RemoveExport", "/private/RemoveExport");

    // Trading
    pub const ADD_ORDER: Endpoint = Endpoint::private("AddOrder", "/private/AddOrder");
    pub const CANCEL_ORDER: Endpoint = Endpoint::private("CancelOrder", "/private/CancelOrder");
    pub const CANCEL_ALL: Endpoint = Endpoint::private("CancelAll", "/private/CancelAll");
    pub const CANCEL_ALL_ORDERS_AFTER: Endpoint =
        Endpoint::private("CancelAllOrdersAfter", "/private/CancelAllOrdersAfter");

    // Funding
    pub const DEPOSIT_METHODS: Endpoint =
        Endpoint::private("DepositMethods", "/private/DepositMethods");
    pub const DEPOSIT_ADDRESSES: Endpoint =
        Endpoint::private("DepositAddresses", "/private/DepositAddresses");
    pub const DEPOSIT_STATUS: Endpoint =
        Endpoint::private("DepositStatus", "/private/DepositStatus");
    pub const WITHDRAW_INFO: Endpoint = Endpoint::private("WithdrawInfo", "/private/WithdrawInfo");
    pub const WITHDRAW: Endpoint = Endpoint::private("Withdraw", "/private/Withdraw");
    pub const WITHDRAW_STATUS: Endpoint =
        Endpoint::private("WithdrawStatus", "/private/WithdrawStatus");
    pub const WITHDRAW_CANCEL: Endpoint =
        Endpoint::private("WithdrawCancel", "/private/WithdrawCancel");
    pub const WALLET_TRANSFER: Endpoint =
        Endpoint::private("WalletTransfer", "/private/WalletTransfer");

    // Earn
    pub const EARN_ALLOCATE: Endpoint = Endpoint::private("Allocate", "/private/Earn/Allocate");
    pub const EARN_DEALLOCATE: Endpoint =
        Endpoint::private("Deallocate", "/private/Earn/Deallocate");
    pub const EARN_ALLOCATE_STATUS: Endpoint =
        Endpoint::private("AllocateStatus", "/private/Earn/AllocateStatus");
    pub const EARN_DEALLOCATE_STATUS: Endpoint =
        Endpoint::private("DeallocateStatus", "/private/Earn/DeallocateStatus");
    pub const EARN_STRATEGIES: Endpoint =
        Endpoint::private("Strategies", "/private/Earn/Strategies");
    pub const EARN_ALLOCATIONS: Endpoint =
        Endpoint::private("Allocations", "/private/Earn/Allocations");

    // WebSocket token
    pub const GET_WEBSOCKETS_TOKEN: Endpoint =
        Endpoint::private("GetWebSocketsToken", "/private/GetWebSocketsToken");
}
