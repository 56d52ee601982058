//! Cancellation and deadlines for a single API call.
//!
//! A [`RequestContext`] travels with the call from request assembly to
//! response decoding. It is checked before anything is sent and raced against
//! the transport while waiting for a response. Once a binary export stream has
//! been handed to the caller, the context no longer governs reading it.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ContextExpiry, KrakenError};

/// Cancellation token plus optional deadline.
///
/// Cloning is cheap; clones share the same token.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use kraken_rest_client::context::RequestContext;
///
/// let ctx = RequestContext::with_timeout(Duration::from_secs(5));
/// assert!(!ctx.is_expired());
/// ctx.cancel();
/// assert!(ctx.is_expired());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl RequestContext {
    /// A context that never expires unless cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            token: CancellationToken::new(),
        }
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// A context driven by an existing cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            token,
        }
    }

    /// Derive a context sharing this one's token with a tighter deadline.
    ///
    /// The earlier of the two deadlines wins.
    pub fn timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(existing), Some(candidate)) => Some(existing.min(candidate)),
            (existing, candidate) => existing.or(candidate),
        };
        Self {
            deadline,
            token: self.token.clone(),
        }
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel this context and every clone of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Why the context is unusable, if it is.
    pub fn expiry(&self) -> Option<ContextExpiry> {
        if self.token.is_cancelled() {
            return Some(ContextExpiry::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextExpiry::DeadlineExceeded),
            _ => None,
        }
    }

    /// Whether the context is cancelled or past its deadline.
    pub fn is_expired(&self) -> bool {
        self.expiry().is_some()
    }

    /// Fail with [`KrakenError::ContextExpired`] if the context is unusable.
    pub fn check(&self) -> Result<(), KrakenError> {
        match self.expiry() {
            Some(reason) => Err(KrakenError::ContextExpired { reason }),
            None => Ok(()),
        }
    }

    /// Drive `future` to completion unless the context expires first.
    ///
    /// The future is dropped as soon as the token fires or the deadline passes.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, KrakenError>
    where
        F: Future,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(KrakenError::ContextExpired {
                reason: ContextExpiry::Cancelled,
            }),
            _ = deadline => Err(KrakenError::ContextExpired {
                reason: ContextExpiry::DeadlineExceeded,
            }),
            output = future => Ok(output),
        }
    }
}
