//! Pluggable HTTP transport.
//!
//! The executor never retries and never pools connections itself; it hands
//! each request to an [`HttpTransport`]. The default transport is a
//! `reqwest-middleware` stack with HTTP tracing and exponential-backoff retries
//! on transient failures.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;

use crate::error::KrakenError;

/// Sends one request and yields the response or a transport-level error.
///
/// Implementations own retry and connection policy and must be safe to share
/// between concurrent calls. Dropping the returned future must abort the call.
pub trait HttpTransport: Send + Sync + 'static {
    /// Perform the round-trip.
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest_middleware::Error>>;
}

impl HttpTransport for ClientWithMiddleware {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest_middleware::Error>> {
        Box::pin(self.execute(request))
    }
}

impl HttpTransport for reqwest::Client {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest_middleware::Error>> {
        Box::pin(async move {
            self.execute(request)
                .await
                .map_err(reqwest_middleware::Error::Reqwest)
        })
    }
}

/// Settings for the default transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum retries for transient failures (5xx, connection errors).
    pub max_retries: u32,
    /// Per-request timeout applied by reqwest, if any.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build the default transport: reqwest behind tracing and retry middleware.
pub fn default_transport(config: &TransportConfig) -> Result<ClientWithMiddleware, KrakenError> {
    let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    let reqwest_client = builder
        .build()
        .map_err(|e| KrakenError::Configuration(format!("Failed to build HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(reqwest_client)
        .with(TracingMiddleware::default())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
