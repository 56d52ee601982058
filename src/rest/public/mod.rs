//! Market data endpoints (no authentication required).

mod types;

pub use types::*;

use std::collections::HashMap;

use serde::Serialize;

use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::public;
use crate::rest::request::FormParams;
use crate::rest::response::KrakenResponse;

#[derive(Serialize)]
struct PairParam<'a> {
    pair: &'a str,
}

impl SpotRestClient {
    /// Get the server time.
    ///
    /// Useful to check that the API is reachable and to estimate clock skew.
    pub async fn get_server_time(&self, ctx: &RequestContext) -> Result<KrakenResponse<ServerTime>, KrakenError> {
        self.call(ctx, &public::TIME, FormParams::empty(), None).await
    }

    /// Get the exchange operating state.
    pub async fn get_system_status(
        &self,
        ctx: &RequestContext,
    ) -> Result<KrakenResponse<SystemStatus>, KrakenError> {
        self.call(ctx, &public::SYSTEM_STATUS, FormParams::empty(), None)
            .await
    }

    /// Get asset information, optionally filtered.
    pub async fn get_assets(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetInfoRequest>,
    ) -> Result<KrakenResponse<HashMap<String, AssetInfo>>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &public::ASSETS, params, None).await
    }

    /// Get tradable asset pairs, optionally filtered.
    pub async fn get_asset_pairs(
        &self,
        ctx: &RequestContext,
        request: Option<&AssetPairsRequest>,
    ) -> Result<KrakenResponse<HashMap<String, AssetPair>>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &public::ASSET_PAIRS, params, None).await
    }

    /// Get ticker information.
    ///
    /// `pair` is a comma-delimited list (e.g. `"XBTUSD,ETHUSD"`).
    pub async fn get_ticker(&self, ctx: &RequestContext, pair: &str) -> Result<KrakenResponse<Tickers>, KrakenError> {
        let params = FormParams::encode(&PairParam { pair })?;
        self.call(ctx, &public::TICKER, params, None).await
    }

    /// Get up to 720 candles for a pair.
    pub async fn get_ohlc(
        &self,
        ctx: &RequestContext,
        request: &OhlcRequest,
    ) -> Result<KrakenResponse<OhlcData>, KrakenError> {
        self.call(ctx, &public::OHLC, FormParams::encode(request)?, None)
            .await
    }

    /// Get the order book for a pair.
    pub async fn get_order_book(
        &self,
        ctx: &RequestContext,
        request: &OrderBookRequest,
    ) -> Result<KrakenResponse<HashMap<String, OrderBook>>, KrakenError> {
        self.call(ctx, &public::DEPTH, FormParams::encode(request)?, None)
            .await
    }

    /// Get recent public trades for a pair.
    pub async fn get_recent_trades(
        &self,
        ctx: &RequestContext,
        request: &RecentTradesRequest,
    ) -> Result<KrakenResponse<RecentTrades>, KrakenError> {
        self.call(ctx, &public::TRADES, FormParams::encode(request)?, None)
            .await
    }

    /// Get recent best bid/ask samples for a pair.
    pub async fn get_recent_spreads(
        &self,
        ctx: &RequestContext,
        request: &RecentSpreadsRequest,
    ) -> Result<KrakenResponse<RecentSpreads>, KrakenError> {
        self.call(ctx, &public::SPREAD, FormParams::encode(request)?, None)
            .await
    }
}
