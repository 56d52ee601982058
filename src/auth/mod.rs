//! Authentication for Kraken private endpoints.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Nonce generation for replay attack prevention
//! - The [`Authorizer`], which signs private requests with HMAC-SHA512
//! - [`SecurityOptions`] for per-call second factors

mod authorizer;
mod credentials;
mod nonce;
mod security;

pub use authorizer::{API_KEY_HEADER, API_SIGN_HEADER, Authorizer};
pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};
pub use nonce::{CounterNonce, IncreasingNonce, NonceProvider};
pub use security::SecurityOptions;
