//! Private REST API endpoints (authentication required).
//!
//! These endpoints need credentials configured on the client. Every method
//! takes an optional [`SecurityOptions`] carrying the account's second factor
//! for keys that require one.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kraken_rest_client::auth::StaticCredentials;
//! use kraken_rest_client::context::RequestContext;
//! use kraken_rest_client::rest::SpotRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Arc::new(StaticCredentials::new("key", "c2VjcmV0"));
//!     let client = SpotRestClient::builder().credentials(credentials).build()?;
//!
//!     let ctx = RequestContext::background();
//!     let balances = client.get_account_balance(&ctx, None).await?.into_result()?;
//!     for (asset, balance) in balances {
//!         println!("{asset}: {balance}");
//!     }
//!     Ok(())
//! }
//! ```

mod account;
mod earn;
mod export;
mod funding;
mod trading;

pub use account::*;
pub use earn::*;
pub use export::*;
pub use funding::*;
pub use trading::*;

use serde::Deserialize;

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::private;
use crate::rest::request::FormParams;
use crate::rest::response::KrakenResponse;

/// Token for authenticating a WebSocket connection.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketToken {
    pub token: String,
    /// Seconds the token stays valid if unused.
    pub expires: u64,
}

impl SpotRestClient {
    /// Get a token for the authenticated WebSocket API.
    pub async fn get_websocket_token(
        &self,
        ctx: &RequestContext,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<WebSocketToken>, KrakenError> {
        self.call(
            ctx,
            &private::GET_WEBSOCKETS_TOKEN,
            FormParams::empty(),
            security,
        )
        .await
    }
}
