//! In-memory identity provider for multi-session board tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

use crate::board::{
    domain::SessionId,
    ports::identity::{IdentityError, IdentityProvider, IdentityResult},
};

/// Identity provider issuing random session identifiers.
///
/// Tokens registered via [`register_token`](Self::register_token) map to
/// fixed sessions; anonymous sign-ins mint fresh ones.
pub struct InMemoryIdentityProvider {
    current: watch::Sender<Option<SessionId>>,
    tokens: Mutex<HashMap<String, SessionId>>,
    reject_next: AtomicBool,
}

impl InMemoryIdentityProvider {
    /// Creates a provider with no signed-in session.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current,
            tokens: Mutex::new(HashMap::new()),
            reject_next: AtomicBool::new(false),
        }
    }

    /// Maps a pre-issued token to a fixed session.
    pub fn register_token(&self, token: impl Into<String>, session: SessionId) {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.insert(token.into(), session);
        }
    }

    /// Rejects the next sign-in attempt. Test support for the
    /// stays-in-awaiting-auth failure path.
    pub fn reject_next_sign_in(&self) {
        self.reject_next.store(true, Ordering::SeqCst);
    }

    /// Clears the current session, notifying watchers.
    pub fn sign_out(&self) {
        self.current.send_replace(None);
    }

    fn take_rejection(&self) -> IdentityResult<()> {
        if self.reject_next.swap(false, Ordering::SeqCst) {
            return Err(IdentityError::AuthenticationFailed(
                "sign-in rejected".to_owned(),
            ));
        }
        Ok(())
    }

    fn publish(&self, session: &SessionId) {
        self.current.send_replace(Some(session.clone()));
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate_anonymous(&self) -> IdentityResult<SessionId> {
        self.take_rejection()?;
        let session = SessionId::random();
        self.publish(&session);
        Ok(session)
    }

    async fn authenticate_with_token(&self, token: &str) -> IdentityResult<SessionId> {
        self.take_rejection()?;
        let session = self
            .tokens
            .lock()
            .ok()
            .and_then(|tokens| tokens.get(token).cloned())
            .ok_or(IdentityError::InvalidToken)?;
        self.publish(&session);
        Ok(session)
    }

    fn watch_session(&self) -> watch::Receiver<Option<SessionId>> {
        self.current.subscribe()
    }
}
