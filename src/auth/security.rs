//! Per-call second factor for private requests.

use secrecy::{ExposeSecret, SecretString};

/// Optional second factor attached to a single private request.
///
/// When an API key is protected by a one-time password, the current code has
/// to be sent as the `otp` form field of every private call.
#[derive(Clone, Default)]
pub struct SecurityOptions {
    otp: Option<SecretString>,
}

impl SecurityOptions {
    /// Options carrying a one-time password.
    pub fn otp(code: impl Into<String>) -> Self {
        Self {
            otp: Some(SecretString::from(code.into())),
        }
    }

    /// Form fields to append to the request body.
    pub(crate) fn form_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.otp
            .as_ref()
            .map(|otp| ("otp", otp.expose_secret()))
            .into_iter()
    }
}

impl std::fmt::Debug for SecurityOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityOptions")
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
