//! Error types for the Kraken REST client.
//!
//! Two failure channels exist and are kept apart:
//!
//! - [`KrakenError`] is returned when the request could not be built, sent or
//!   decoded (configuration, transport, HTTP status, content type, JSON shape).
//! - The `error` array of the response envelope carries rejections made by the
//!   exchange itself. A call can succeed at the transport level and still carry
//!   a non-empty array; see [`KrakenResponse`](crate::rest::KrakenResponse).

use thiserror::Error;

use crate::rest::ResponseMeta;

/// The main error type for all Kraken client operations.
#[derive(Error, Debug)]
pub enum KrakenError {
    /// Bad key material or client settings, detected at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request could not be assembled (bad method token, path or parameters).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A private endpoint was called on a client built without credentials.
    #[error("Missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,

    /// The request context was cancelled or its deadline elapsed.
    #[error("Request context expired: {reason}")]
    ContextExpired {
        /// Why the context is no longer usable.
        reason: ContextExpiry,
    },

    /// The HTTP transport failed to produce a response.
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The server answered with a status other than 200.
    #[error("Unexpected HTTP status {}", .meta.status)]
    UnexpectedStatus {
        /// Status, headers and URL of the rejected response.
        meta: Box<ResponseMeta>,
    },

    /// The `Content-Type` header is missing or not a valid media type.
    #[error("Could not parse Content-Type {value:?}: {reason}")]
    ContentTypeParse {
        /// Raw header value (empty if absent).
        value: String,
        /// Parser diagnostic.
        reason: String,
        /// Metadata of the offending response.
        meta: Box<ResponseMeta>,
    },

    /// The response body has a media type the protocol does not use.
    #[error("Unexpected Content-Type: {content_type}")]
    UnexpectedContentType {
        /// Media type essence reported by the server (e.g. `text/plain`).
        content_type: String,
        /// Metadata of the offending response.
        meta: Box<ResponseMeta>,
    },

    /// The JSON payload could not be decoded into the expected envelope.
    #[error("JSON decode error ({kind}): {source}")]
    JsonDecode {
        /// Broad category of the failure.
        kind: JsonErrorKind,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
        /// Metadata of the offending response.
        meta: Box<ResponseMeta>,
    },

    /// Kraken API returned an error in the response envelope.
    #[error("Kraken API error: {0}")]
    Api(ApiError),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds before retrying
        retry_after_ms: Option<u64>,
    },

    /// The envelope reported no errors but carried no `result` either.
    #[error("Response missing 'result' field")]
    MissingResult,
}

impl KrakenError {
    /// Short, stable name of the error kind, suitable for span attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            KrakenError::Configuration(_) => "configuration",
            KrakenError::MalformedRequest(_) => "malformed_request",
            KrakenError::MissingCredentials => "missing_credentials",
            KrakenError::ContextExpired { .. } => "context_expired",
            KrakenError::Transport(_) => "transport",
            KrakenError::UnexpectedStatus { .. } => "unexpected_status",
            KrakenError::ContentTypeParse { .. } => "content_type_parse",
            KrakenError::UnexpectedContentType { .. } => "unexpected_content_type",
            KrakenError::JsonDecode { .. } => "json_decode",
            KrakenError::Api(_) => "api",
            KrakenError::RateLimitExceeded { .. } => "rate_limit",
            KrakenError::MissingResult => "missing_result",
        }
    }

    /// Response metadata, if the error was raised after a response arrived.
    pub fn response_meta(&self) -> Option<&ResponseMeta> {
        match self {
            KrakenError::UnexpectedStatus { meta }
            | KrakenError::ContentTypeParse { meta, .. }
            | KrakenError::UnexpectedContentType { meta, .. }
            | KrakenError::JsonDecode { meta, .. } => Some(meta),
            _ => None,
        }
    }

    /// Whether retrying the same call with a fresh context could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            KrakenError::ContextExpired { .. }
            | KrakenError::Transport(_)
            | KrakenError::RateLimitExceeded { .. } => true,
            KrakenError::Api(api) => api.is_service_unavailable(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for KrakenError {
    fn from(error: reqwest::Error) -> Self {
        KrakenError::Transport(reqwest_middleware::Error::Reqwest(error))
    }
}

/// Why a [`RequestContext`](crate::context::RequestContext) stopped a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextExpiry {
    /// The cancellation token fired.
    Cancelled,
    /// The deadline passed.
    DeadlineExceeded,
}

impl std::fmt::Display for ContextExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextExpiry::Cancelled => write!(f, "context cancelled"),
            ContextExpiry::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Category of a JSON decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorKind {
    /// Valid JSON whose shape or types do not match the receiver.
    TypeMismatch,
    /// The body is not syntactically valid JSON.
    Syntax,
    /// The body ended in the middle of a value.
    UnexpectedEof,
    /// Reading the body failed while decoding.
    Io,
}

impl From<serde_json::error::Category> for JsonErrorKind {
    fn from(category: serde_json::error::Category) -> Self {
        use serde_json::error::Category;
        match category {
            Category::Data => JsonErrorKind::TypeMismatch,
            Category::Syntax => JsonErrorKind::Syntax,
            Category::Eof => JsonErrorKind::UnexpectedEof,
            Category::Io => JsonErrorKind::Io,
        }
    }
}

impl std::fmt::Display for JsonErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JsonErrorKind::TypeMismatch => "type mismatch",
            JsonErrorKind::Syntax => "syntax",
            JsonErrorKind::UnexpectedEof => "unexpected end of input",
            JsonErrorKind::Io => "io",
        };
        f.write_str(s)
    }
}

/// Kraken API error codes and messages.
///
/// These are errors returned by the Kraken API itself in the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The error category from Kraken (e.g., "EGeneral")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Parse a single `"ECategory:Message"` string.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((code, message)) => Self::new(code, message),
            None => Self::new("Unknown", raw),
        }
    }

    /// Parse the first entry of Kraken's error array format.
    ///
    /// Kraken returns errors as an array like `["EGeneral:Invalid arguments"]`
    pub fn from_error_array(errors: &[String]) -> Option<Self> {
        errors.first().map(|e| Self::parse(e))
    }

    /// Get the full error string in Kraken's format (code:message).
    pub fn full_code(&self) -> String {
        format!("{}:{}", self.code, self.message)
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        (self.code == "EAPI" || self.code == "EOrder") && self.message.contains("Rate limit")
    }

    /// Check if this is an invalid nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        self.code == "EAPI" && self.message.contains("Invalid nonce")
    }

    /// Check if this is an invalid key error.
    pub fn is_invalid_key(&self) -> bool {
        self.code == "EAPI" && self.message.contains("Invalid key")
    }

    /// Check if this is an invalid signature error.
    pub fn is_invalid_signature(&self) -> bool {
        self.code == "EAPI" && self.message.contains("Invalid signature")
    }

    /// Check if this is a permission denied error.
    pub fn is_permission_denied(&self) -> bool {
        self.code == "EGeneral" && self.message.contains("Permission denied")
    }

    /// Check if this is a service unavailable error.
    pub fn is_service_unavailable(&self) -> bool {
        self.code == "EService"
            && (self.message.contains("Unavailable") || self.message.contains("Busy"))
    }
}

/// Known Kraken error codes for pattern matching.
pub mod error_codes {
    pub const INVALID_ARGUMENTS: &str = "EGeneral:Invalid arguments";
    pub const PERMISSION_DENIED: &str = "EGeneral:Permission denied";
    pub const INVALID_KEY: &str = "EAPI:Invalid key";
    pub const INVALID_SIGNATURE: &str = "EAPI:Invalid signature";
    pub const INVALID_NONCE: &str = "EAPI:Invalid nonce";
    pub const RATE_LIMIT_EXCEEDED: &str = "EAPI:Rate limit exceeded";
    pub const INVALID_OTP: &str = "EAPI:Invalid OTP";
    pub const INSUFFICIENT_FUNDS: &str = "EOrder:Insufficient funds";
    pub const SERVICE_UNAVAILABLE: &str = "EService:Unavailable";
    pub const SERVICE_BUSY: &str = "EService:Busy";
    pub const UNKNOWN_ASSET_PAIR: &str = "EQuery:Unknown asset pair";
    pub const EXPORT_NOT_READY: &str = "EExport:Not ready";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_array() {
        let errors = vec![error_codes::INVALID_KEY.to_string()];
        let error = ApiError::from_error_array(&errors).unwrap();
        assert_eq!(error.code, "EAPI");
        assert_eq!(error.message, "Invalid key");
        assert!(error.is_invalid_key());
        assert_eq!(error.full_code(), error_codes::INVALID_KEY);
    }

    #[test]
    fn test_api_error_without_category() {
        let error = ApiError::parse("something odd");
        assert_eq!(error.code, "Unknown");
        assert_eq!(error.message, "something odd");
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new("EOrder", "Insufficient funds");
        assert_eq!(error.to_string(), "EOrder: Insufficient funds");
    }

    #[test]
    fn test_json_kind_from_category() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert_eq!(JsonErrorKind::from(err.classify()), JsonErrorKind::TypeMismatch);

        let err = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        assert_eq!(JsonErrorKind::from(err.classify()), JsonErrorKind::UnexpectedEof);

        let err = serde_json::from_str::<u32>("}").unwrap_err();
        assert_eq!(JsonErrorKind::from(err.classify()), JsonErrorKind::Syntax);
    }

    #[test]
    fn test_error_kinds_and_retryability() {
        let expired = KrakenError::ContextExpired {
            reason: ContextExpiry::Cancelled,
        };
        assert_eq!(expired.kind(), "context_expired");
        assert!(expired.is_retryable());
        assert!(expired.response_meta().is_none());

        let config = KrakenError::Configuration("bad secret".into());
        assert!(!config.is_retryable());

        let busy = KrakenError::Api(ApiError::parse(error_codes::SERVICE_BUSY));
        assert!(busy.is_retryable());
    }
}
