//! Decoded responses.
//!
//! A call produces either a JSON envelope ([`KrakenResponse`]) or, for report
//! downloads, a live byte stream ([`ExportStream`]); never both.

use bytes::Bytes;
use futures_util::Stream;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, KrakenError};
use crate::rest::media_type::MediaType;

/// The `{"error": [...], "result": ...}` envelope every JSON endpoint uses.
///
/// A transport-level success says nothing about whether Kraken accepted the
/// operation: check [`KrakenResponse::error`] (or call
/// [`KrakenResponse::into_result`]) as well.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    /// Errors reported by the exchange, in `ECategory:Message` form.
    #[serde(default)]
    pub error: Vec<String>,
    /// The payload; absent or partial when `error` is non-empty.
    pub result: Option<T>,
}

impl<T> KrakenResponse<T> {
    /// Whether the exchange reported no errors.
    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }

    /// The first exchange error, parsed.
    pub fn api_error(&self) -> Option<ApiError> {
        ApiError::from_error_array(&self.error)
    }

    /// Fold the envelope into a single `Result`.
    ///
    /// Rate-limit rejections become [`KrakenError::RateLimitExceeded`], other
    /// rejections [`KrakenError::Api`], and an empty envelope
    /// [`KrakenError::MissingResult`].
    pub fn into_result(self) -> Result<T, KrakenError> {
        if let Some(api_error) = self.api_error() {
            if api_error.is_rate_limit() {
                return Err(KrakenError::RateLimitExceeded {
                    retry_after_ms: None,
                });
            }
            return Err(KrakenError::Api(api_error));
        }
        self.result.ok_or(KrakenError::MissingResult)
    }
}

/// Status line, headers and URL of a received response.
///
/// Kept on success and attached to errors raised after the response arrived,
/// so diagnostics survive even when the body is discarded.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final URL (after redirects).
    pub url: Url,
}

impl ResponseMeta {
    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }
}

/// A binary report body left open for incremental reading.
///
/// The connection stays checked out until the stream is read to the end,
/// [`closed`](ExportStream::close) or dropped. Cancelling the context that
/// produced it has no effect on reading.
#[derive(Debug)]
pub struct ExportStream {
    media_type: MediaType,
    response: reqwest::Response,
}

impl ExportStream {
    pub(crate) fn new(media_type: MediaType, response: reqwest::Response) -> Self {
        Self {
            media_type,
            response,
        }
    }

    /// Media type the server declared (`application/zip`, ...).
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// Size announced by `Content-Length`, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Read the next chunk; `None` once the body is exhausted.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, KrakenError> {
        Ok(self.response.chunk().await?)
    }

    /// Read everything that is left into memory.
    pub async fn bytes(self) -> Result<Bytes, KrakenError> {
        Ok(self.response.bytes().await?)
    }

    /// Turn the body into a `Stream` of chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, KrakenError>> {
        use futures_util::TryStreamExt;
        self.response.bytes_stream().map_err(KrakenError::from)
    }

    /// Release the connection without reading the rest of the body.
    pub fn close(self) {
        drop(self.response);
    }
}

/// What the decoder produced for a call.
#[derive(Debug)]
pub enum Decoded<T> {
    /// `application/json`: the envelope, body already consumed and closed.
    Json(KrakenResponse<T>),
    /// Binary report: the body is still open.
    Stream(ExportStream),
}

/// Outcome of a successful execution.
#[derive(Debug)]
pub struct Executed<T> {
    /// Response status, headers and URL.
    pub meta: ResponseMeta,
    /// JSON envelope or live stream.
    pub body: Decoded<T>,
}

impl<T> Executed<T> {
    /// The JSON envelope; fails with [`KrakenError::UnexpectedContentType`]
    /// (closing the stream) if a binary body arrived instead.
    pub fn into_json(self) -> Result<KrakenResponse<T>, KrakenError> {
        match self.body {
            Decoded::Json(envelope) => Ok(envelope),
            Decoded::Stream(stream) => {
                let content_type = stream.media_type().essence().to_string();
                stream.close();
                Err(KrakenError::UnexpectedContentType {
                    content_type,
                    meta: Box::new(self.meta),
                })
            }
        }
    }
}
