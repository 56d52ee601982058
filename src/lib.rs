//! # Kraken REST Client
//!
//! An async Rust client library for the Kraken exchange REST API.
//!
//! ## Features
//!
//! - Typed methods for market data, account, trading, funding, earn and data
//!   export endpoints
//! - HMAC-SHA512 request signing with pluggable credentials and nonces
//! - Per-call cancellation and deadlines through [`context::RequestContext`]
//! - Binary report downloads streamed straight from the response body
//! - Optional tracing decorator, [`instrument::TracedClient`]
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kraken_rest_client::context::RequestContext;
//! use kraken_rest_client::rest::SpotRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpotRestClient::new()?;
//!     let ctx = RequestContext::background();
//!
//!     let response = client.get_server_time(&ctx).await?;
//!     println!("Server time: {:?}", response.into_result()?);
//!     Ok(())
//! }
//! ```
//!
//! Transport failures and exchange rejections travel separately: the
//! returned `Result` fails only when the call itself failed, while errors
//! reported by Kraken are in [`rest::KrakenResponse::error`].

pub mod auth;
pub mod context;
pub mod error;
pub mod instrument;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use context::RequestContext;
pub use error::KrakenError;
pub use rest::{KrakenClient, KrakenResponse, SpotRestClient};
pub use types::common::{BuySell, OrderStatus, OrderType};

/// Result type alias using KrakenError
pub type Result<T> = std::result::Result<T, KrakenError>;
