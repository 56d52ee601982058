//! Kraken Spot REST API client.
//!
//! The layers, bottom up:
//!
//! - [`RequestFactory`] turns an endpoint path, method, query and form body
//!   into a ready-to-send request, signing it when a nonce is given.
//! - [`Executor`] sends a request through an [`HttpTransport`] and decodes the
//!   response into a [`KrakenResponse`] envelope or an [`ExportStream`].
//! - [`SpotRestClient`] pairs the two with a nonce source and exposes one
//!   method per endpoint, all routed through a single generic call helper.
//!
//! # Trait-based API
//!
//! The [`KrakenClient`] trait abstracts every endpoint operation, so callers
//! can swap in mocks or decorators such as
//! [`TracedClient`](crate::instrument::TracedClient).
//!
//! ```rust,no_run
//! use kraken_rest_client::context::RequestContext;
//! use kraken_rest_client::error::KrakenError;
//! use kraken_rest_client::rest::KrakenClient;
//!
//! async fn print_time<C: KrakenClient>(client: &C) -> Result<(), KrakenError> {
//!     let ctx = RequestContext::background();
//!     let time = client.get_server_time(&ctx).await?.into_result()?;
//!     println!("Server time: {}", time.unixtime);
//!     Ok(())
//! }
//! ```

mod client;
pub mod endpoints;
mod executor;
mod media_type;
pub mod private;
pub mod public;
mod request;
mod response;
mod traits;
mod transport;

pub use client::{SpotRestClient, SpotRestClientBuilder};
pub use endpoints::{API_VERSION, Access, Endpoint, HttpMethod, KRAKEN_BASE_URL};
pub use executor::Executor;
pub use media_type::{MediaType, MediaTypeError};
pub use request::{FORM_URLENCODED, FormParams, PrivateAuth, RequestFactory, RequestParts};
pub use response::{Decoded, Executed, ExportStream, KrakenResponse, ResponseMeta};
pub use traits::{KrakenClient, Reply};
pub use transport::{HttpTransport, TransportConfig, default_transport};
