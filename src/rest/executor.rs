//! Request execution and response classification.
//!
//! [`Executor::execute`] sends one prepared request through the configured
//! [`HttpTransport`] and sorts the outcome:
//!
//! 1. the context is checked; an expired context never reaches the transport
//! 2. transport failures come back as [`KrakenError::Transport`]
//! 3. any status other than 200 is [`KrakenError::UnexpectedStatus`]
//! 4. a missing or unparsable `Content-Type` is [`KrakenError::ContentTypeParse`]
//! 5. `application/json` is decoded into the envelope and the body closed
//! 6. binary report types are returned as an open [`ExportStream`]
//! 7. anything else is [`KrakenError::UnexpectedContentType`]

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Request, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::{JsonErrorKind, KrakenError};
use crate::rest::media_type::MediaType;
use crate::rest::response::{Decoded, ExportStream, Executed, KrakenResponse, ResponseMeta};
use crate::rest::transport::HttpTransport;

/// Sends requests and decodes responses. Holds no per-call state.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    /// Wrap a transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send `request` and classify the response.
    ///
    /// The context bounds the wait for the response and, for JSON bodies, the
    /// read of the body. It has no hold on an [`ExportStream`] once returned.
    pub async fn execute<T>(&self, ctx: &RequestContext, request: Request) -> Result<Executed<T>, KrakenError>
    where
        T: DeserializeOwned,
    {
        ctx.check()?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending Kraken request");

        let response = match ctx.run(self.transport.send(request)).await? {
            Ok(response) => response,
            Err(err) => {
                // A transport that honours the request timeout reports the
                // deadline as its own error; surface it as the context's.
                if let Some(reason) = ctx.expiry() {
                    return Err(KrakenError::ContextExpired { reason });
                }
                warn!(%method, %path, error = %err, "Kraken transport error");
                return Err(KrakenError::Transport(err));
            }
        };

        let meta = ResponseMeta::from_response(&response);

        if meta.status != StatusCode::OK {
            warn!(%method, %path, status = %meta.status, "unexpected HTTP status from Kraken");
            return Err(KrakenError::UnexpectedStatus { meta: Box::new(meta) });
        }

        let raw_content_type = meta
            .headers
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();

        let media_type = match MediaType::parse(&raw_content_type) {
            Ok(media_type) => media_type,
            Err(reason) => {
                return Err(KrakenError::ContentTypeParse {
                    value: raw_content_type,
                    reason: reason.to_string(),
                    meta: Box::new(meta),
                });
            }
        };

        if media_type.is_json() {
            let body = ctx.run(response.bytes()).await??;
            let envelope = decode_envelope::<T>(&body, &meta)?;
            if !envelope.error.is_empty() {
                debug!(%path, errors = ?envelope.error, "Kraken reported errors");
            }
            return Ok(Executed {
                meta,
                body: Decoded::Json(envelope),
            });
        }

        if media_type.is_binary_blob() {
            debug!(%path, content_type = %media_type, "returning binary export stream");
            return Ok(Executed {
                meta,
                body: Decoded::Stream(ExportStream::new(media_type, response)),
            });
        }

        drop(response);
        Err(KrakenError::UnexpectedContentType {
            content_type: media_type.essence().to_string(),
            meta: Box::new(meta),
        })
    }
}

fn decode_envelope<T>(body: &[u8], meta: &ResponseMeta) -> Result<KrakenResponse<T>, KrakenError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|source| KrakenError::JsonDecode {
        kind: JsonErrorKind::from(source.classify()),
        source,
        meta: Box::new(meta.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use url::Url;

    fn meta() -> ResponseMeta {
        ResponseMeta {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            url: Url::parse("https://api.kraken.com/0/public/Time").unwrap(),
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Time {
        #[allow(dead_code)]
        unixtime: i64,
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = decode_envelope::<Time>(br#"{"error":[],"result":{"unixtime":"soon"}}"#, &meta())
            .unwrap_err();
        assert!(matches!(
            err,
            KrakenError::JsonDecode {
                kind: JsonErrorKind::TypeMismatch,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_syntax_error() {
        let err = decode_envelope::<Time>(b"{\"error\": [}", &meta()).unwrap_err();
        assert!(matches!(
            err,
            KrakenError::JsonDecode {
                kind: JsonErrorKind::Syntax,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let err = decode_envelope::<Time>(b"{\"error\": [", &meta()).unwrap_err();
        assert!(matches!(
            err,
            KrakenError::JsonDecode {
                kind: JsonErrorKind::UnexpectedEof,
                ..
            }
        ));
        assert!(err.response_meta().is_some());
    }
}
