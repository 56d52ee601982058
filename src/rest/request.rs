//! Request assembly.
//!
//! [`RequestFactory::build`] turns a path, method, content type and encoded
//! parameters into a `reqwest::Request`. For private endpoints it prepends the
//! nonce to the form body, appends the second factor and has the
//! [`Authorizer`] sign the exact body that will be sent. Nothing here performs
//! I/O.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, Request};
use serde::Serialize;
use tracing::debug;
use url::Url;
use url::form_urlencoded;

use crate::auth::{Authorizer, SecurityOptions};
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::endpoints::API_VERSION;

/// Content type of private request bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// URL-encoded parameters, ready to be used as a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(String);

impl FormParams {
    /// No parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode any serializable struct or list of pairs.
    pub fn encode<P>(params: &P) -> Result<Self, KrakenError>
    where
        P: Serialize + ?Sized,
    {
        serde_urlencoded::to_string(params)
            .map(Self)
            .map_err(|e| KrakenError::MalformedRequest(format!("Could not encode parameters: {e}")))
    }

    /// Encode optional parameters, treating `None` as empty.
    pub fn encode_opt<P>(params: Option<&P>) -> Result<Self, KrakenError>
    where
        P: Serialize + ?Sized,
    {
        params.map(Self::encode).transpose().map(Option::unwrap_or_default)
    }

    /// The encoded string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Signing inputs for a private request.
#[derive(Debug, Clone, Copy)]
pub struct PrivateAuth<'a> {
    /// Nonce for this request; must exceed the last one used with the key.
    pub nonce: u64,
    /// Optional second factor.
    pub security: Option<&'a SecurityOptions>,
}

/// Everything needed to assemble one request.
#[derive(Debug, Clone)]
pub struct RequestParts<'a> {
    /// Path below the version segment, e.g. `/private/Balance`.
    pub path: &'a str,
    /// HTTP method token.
    pub method: &'a str,
    /// Content type of the body; required whenever a body is sent.
    pub content_type: Option<&'a str>,
    /// Query string parameters.
    pub query: FormParams,
    /// Form body parameters (without nonce or second factor).
    pub body: FormParams,
    /// Present for private endpoints.
    pub auth: Option<PrivateAuth<'a>>,
}

impl<'a> RequestParts<'a> {
    /// A public GET with query parameters.
    pub fn get(path: &'a str, query: FormParams) -> Self {
        Self {
            path,
            method: "GET",
            content_type: None,
            query,
            body: FormParams::empty(),
            auth: None,
        }
    }

    /// A form-encoded POST.
    pub fn post(path: &'a str, body: FormParams) -> Self {
        Self {
            path,
            method: "POST",
            content_type: Some(FORM_URLENCODED),
            query: FormParams::empty(),
            body,
            auth: None,
        }
    }

    /// Mark the request as private, to be signed with `nonce`.
    pub fn private(mut self, nonce: u64, security: Option<&'a SecurityOptions>) -> Self {
        self.auth = Some(PrivateAuth { nonce, security });
        self
    }
}

/// Builds requests against one base URL with one identity.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    base_url: Url,
    user_agent: HeaderValue,
    authorizer: Option<Arc<Authorizer>>,
}

impl RequestFactory {
    /// Create a factory.
    pub fn new(base_url: Url, user_agent: HeaderValue, authorizer: Option<Arc<Authorizer>>) -> Self {
        Self {
            base_url,
            user_agent,
            authorizer,
        }
    }

    /// The base URL requests are built against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether private requests can be signed.
    pub fn has_authorizer(&self) -> bool {
        self.authorizer.is_some()
    }

    /// Assemble (and for private endpoints, sign) a request.
    ///
    /// The time left on `ctx` becomes the request timeout so the transport
    /// stops waiting when the deadline passes.
    pub fn build(&self, ctx: &RequestContext, parts: RequestParts<'_>) -> Result<Request, KrakenError> {
        let method = Method::from_bytes(parts.method.as_bytes()).map_err(|_| {
            KrakenError::MalformedRequest(format!("Invalid HTTP method {:?}", parts.method))
        })?;

        let (url, api_path) = self.url_for(parts.path, &parts.query)?;

        let body = match parts.auth {
            Some(auth) => signed_form(auth, &parts.body),
            None => parts.body.0,
        };

        if !body.is_empty() && method == Method::GET {
            return Err(KrakenError::MalformedRequest(
                "GET requests carry parameters in the query string".into(),
            ));
        }

        let mut request = Request::new(method, url);
        request.headers_mut().insert(USER_AGENT, self.user_agent.clone());

        if !body.is_empty() {
            let content_type = parts.content_type.ok_or_else(|| {
                KrakenError::MalformedRequest("A request body requires a content type".into())
            })?;
            let content_type = HeaderValue::from_str(content_type).map_err(|_| {
                KrakenError::MalformedRequest(format!("Invalid content type {content_type:?}"))
            })?;
            request.headers_mut().insert(CONTENT_TYPE, content_type);
        }

        if let Some(remaining) = ctx.remaining() {
            *request.timeout_mut() = Some(remaining);
        }

        if let Some(auth) = parts.auth {
            let authorizer = self
                .authorizer
                .as_ref()
                .ok_or(KrakenError::MissingCredentials)?;
            authorizer.authorize(&mut request, &api_path, auth.nonce, &body)?;
        }

        debug!(
            method = %request.method(),
            path = request.url().path(),
            private = parts.auth.is_some(),
            "built Kraken request"
        );

        if !body.is_empty() {
            *request.body_mut() = Some(body.into());
        }

        Ok(request)
    }

    /// The URL to send to and the `/0/...` path that gets signed.
    ///
    /// The versioned path is appended to whatever path the base URL already
    /// has, so a base mounted under a prefix keeps it.
    fn url_for(&self, path: &str, query: &FormParams) -> Result<(Url, String), KrakenError> {
        if !path.starts_with('/') || path.contains(['?', '#']) {
            return Err(KrakenError::MalformedRequest(format!("Invalid endpoint path {path:?}")));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(KrakenError::MalformedRequest(format!(
                "Base URL {} cannot carry a path",
                self.base_url
            )));
        }

        let api_path = format!("/{API_VERSION}{path}");
        let mut url = self.base_url.clone();
        let full_path = format!("{}{api_path}", url.path().trim_end_matches('/'));
        url.set_path(&full_path);
        url.set_fragment(None);
        url.set_query((!query.is_empty()).then(|| query.as_str()));

        Ok((url, api_path))
    }
}

/// `nonce=<n>[&<params>][&otp=<code>]`
fn signed_form(auth: PrivateAuth<'_>, params: &FormParams) -> String {
    let mut form = format!("nonce={}", auth.nonce);
    if !params.is_empty() {
        form.push('&');
        form.push_str(params.as_str());
    }

    let mut serializer = form_urlencoded::Serializer::new(form);
    if let Some(security) = auth.security {
        serializer.extend_pairs(security.form_fields());
    }
    serializer.finish()
}
