//! HMAC-SHA512 request signing for Kraken private endpoints.
//!
//! Kraken private endpoints require a signature computed as:
//! ```text
//! HMAC-SHA512(path + SHA256(nonce + POST_data), base64_decode(api_secret))
//! ```
//!
//! The signature is then base64-encoded and sent in the `API-Sign` header,
//! next to the public key in `API-Key`.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderName, HeaderValue};
use sha2::{Digest, Sha256, Sha512};

use crate::auth::Credentials;
use crate::error::KrakenError;

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the public API key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("api-key");
/// Header carrying the base64 request signature.
pub const API_SIGN_HEADER: HeaderName = HeaderName::from_static("api-sign");

/// Signs requests for Kraken's private API.
///
/// The secret is decoded and keyed into the HMAC once, when the authorizer is
/// built; signing afterwards cannot fail and never touches the raw secret
/// again. An `Authorizer` holds no mutable state and can be shared across
/// tasks. Nonce ordering is the caller's concern.
///
/// # Example
///
/// ```rust
/// use kraken_rest_client::auth::Authorizer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let authorizer = Authorizer::new("api_key", "YXBpX3NlY3JldA==")?; // base64 of "api_secret"
/// let signature = authorizer.sign("/0/private/Balance", 1234567890, "nonce=1234567890");
/// assert_eq!(signature.len(), 88);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Authorizer {
    api_key: HeaderValue,
    mac: HmacSha512,
}

impl Authorizer {
    /// Build an authorizer from an API key and a base64-encoded secret.
    ///
    /// Fails with [`KrakenError::Configuration`] if the secret is not valid
    /// base64 or the key cannot be sent as a header value.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self, KrakenError> {
        let secret = BASE64
            .decode(api_secret)
            .map_err(|e| KrakenError::Configuration(format!("API secret must be valid base64: {e}")))?;

        let mac = HmacSha512::new_from_slice(&secret)
            .map_err(|e| KrakenError::Configuration(format!("Invalid HMAC key: {e}")))?;

        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            KrakenError::Configuration("API key contains characters not allowed in a header".into())
        })?;
        api_key.set_sensitive(true);

        Ok(Self { api_key, mac })
    }

    /// Build an authorizer from stored credentials.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, KrakenError> {
        Self::new(&credentials.api_key, credentials.expose_secret())
    }

    /// Compute the base64 signature for a request.
    ///
    /// # Arguments
    ///
    /// * `path` - The exchange-relative path (e.g., "/0/private/Balance")
    /// * `nonce` - The nonce, already embedded in `form_body` as `nonce=`
    /// * `form_body` - The URL-encoded POST body exactly as it will be sent
    pub fn sign(&self, path: &str, nonce: u64, form_body: &str) -> String {
        let mut sha256 = Sha256::new();
        sha256.update(nonce.to_string().as_bytes());
        sha256.update(form_body.as_bytes());
        let body_digest = sha256.finalize();

        let mut mac = self.mac.clone();
        mac.update(path.as_bytes());
        mac.update(&body_digest);

        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Attach the `API-Key` and `API-Sign` headers to `request`.
    ///
    /// Nothing is sent; only the headers change.
    pub fn authorize(
        &self,
        request: &mut reqwest::Request,
        path: &str,
        nonce: u64,
        form_body: &str,
    ) -> Result<(), KrakenError> {
        let signature = self.sign(path, nonce, form_body);
        let mut signature = HeaderValue::try_from(signature)
            .map_err(|e| KrakenError::MalformedRequest(format!("Invalid signature header: {e}")))?;
        signature.set_sensitive(true);

        let headers = request.headers_mut();
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers.insert(API_SIGN_HEADER, signature);
        Ok(())
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("api_key", &self.api_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
    const DOC_BODY: &str =
        "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25";
    const DOC_SIGNATURE: &str =
        "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ==";

    #[test]
    fn test_known_signature_vector() {
        let authorizer = Authorizer::new("key", DOC_SECRET).unwrap();
        let signature = authorizer.sign("/0/private/AddOrder", 1616492376594, DOC_BODY);
        assert_eq!(signature, DOC_SIGNATURE);
    }

    #[test]
    fn test_signature_consistency() {
        let authorizer = Authorizer::new("key", &BASE64.encode("my_secret")).unwrap();

        let sig1 = authorizer.sign("/0/private/TradeBalance", 12345, "nonce=12345&asset=ZUSD");
        let sig2 = authorizer.sign("/0/private/TradeBalance", 12345, "nonce=12345&asset=ZUSD");

        assert_eq!(sig1, sig2);
        // HMAC-SHA512 produces 64 bytes, base64 encoded = 88 chars (with padding)
        assert_eq!(sig1.len(), 88);
    }

    #[test]
    fn test_signature_changes_with_nonce_and_path() {
        let authorizer = Authorizer::new("key", &BASE64.encode("my_secret")).unwrap();

        let base = authorizer.sign("/0/private/Balance", 12345, "nonce=12345");
        let other_nonce = authorizer.sign("/0/private/Balance", 12346, "nonce=12346");
        let other_path = authorizer.sign("/0/private/TradeBalance", 12345, "nonce=12345");

        assert_ne!(base, other_nonce);
        assert_ne!(base, other_path);
    }

    #[test]
    fn test_invalid_base64_secret_is_configuration_error() {
        let err = Authorizer::new("key", "not base64!!").unwrap_err();
        assert!(matches!(err, KrakenError::Configuration(_)));
    }

    #[test]
    fn test_invalid_api_key_is_configuration_error() {
        let err = Authorizer::new("bad\nkey", DOC_SECRET).unwrap_err();
        assert!(matches!(err, KrakenError::Configuration(_)));
    }

    #[test]
    fn test_authorize_sets_headers() {
        let authorizer = Authorizer::new("public-key", DOC_SECRET).unwrap();
        let url = reqwest::Url::parse("https://api.kraken.com/0/private/AddOrder").unwrap();
        let mut request = reqwest::Request::new(reqwest::Method::POST, url);

        authorizer
            .authorize(&mut request, "/0/private/AddOrder", 1616492376594, DOC_BODY)
            .unwrap();

        assert_eq!(request.headers()[API_KEY_HEADER], "public-key");
        assert_eq!(request.headers()[API_SIGN_HEADER], DOC_SIGNATURE);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let authorizer = Authorizer::new("key", DOC_SECRET).unwrap();
        let debug = format!("{authorizer:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(DOC_SECRET));
    }
}
