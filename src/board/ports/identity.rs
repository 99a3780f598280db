//! Identity port issuing opaque session identifiers.

use crate::board::domain::SessionId;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Session issuance and session-change notification contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in without credentials and returns a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AuthenticationFailed`] when the provider
    /// rejects the sign-in.
    async fn authenticate_anonymous(&self) -> IdentityResult<SessionId>;

    /// Signs in with a pre-issued token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] when the token is rejected.
    async fn authenticate_with_token(&self, token: &str) -> IdentityResult<SessionId>;

    /// Returns a watch on the current session.
    ///
    /// The receiver observes `None` while signed out. Dropping the receiver
    /// releases the registration; callers hold at most one watch at a time.
    fn watch_session(&self) -> watch::Receiver<Option<SessionId>>;
}

/// Errors returned by identity providers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The provider rejected the sign-in attempt.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The supplied session token was rejected.
    #[error("session token rejected")]
    InvalidToken,
}
