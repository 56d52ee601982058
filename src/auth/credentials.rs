//! API key and secret storage.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::error::KrakenError;

/// Default environment variable holding the API key.
pub const API_KEY_VAR: &str = "KRAKEN_API_KEY";
/// Default environment variable holding the base64 API secret.
pub const API_SECRET_VAR: &str = "KRAKEN_API_SECRET";

/// API credentials containing the key and secret.
///
/// The secret stays wrapped in [`SecretString`] and is only exposed to build
/// an [`Authorizer`](crate::auth::Authorizer).
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier, sent with every private request)
    pub api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and a base64-encoded secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Get the API secret for signing.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of API credentials.
///
/// Implement this trait to pull credentials from a secrets manager or similar.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

impl<P: CredentialsProvider + ?Sized> CredentialsProvider for Arc<P> {
    fn get_credentials(&self) -> &Credentials {
        (**self).get_credentials()
    }
}

/// Credentials held directly in memory.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key, api_secret),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials read once from environment variables.
#[derive(Debug)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Read `KRAKEN_API_KEY` and `KRAKEN_API_SECRET`.
    pub fn from_env() -> Result<Self, KrakenError> {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Read credentials from custom environment variable names.
    ///
    /// Fails with [`KrakenError::Configuration`] naming the missing variable.
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> Result<Self, KrakenError> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                KrakenError::Configuration(format!("Environment variable {name} not set"))
            })
        };

        Ok(Self {
            credentials: Credentials::new(read(key_var)?, read(secret_var)?),
        })
    }

    /// Like [`EnvCredentials::from_env`], but `None` when either variable is unset.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}
