//! Snapshot synchronization controller and its loading state machine.

use std::sync::Arc;
use tracing::{info, warn};

use crate::board::{
    domain::{BoardColumns, SessionId, Task, fields},
    ports::{
        identity::IdentityProvider,
        store::{StoreEvent, Subscription, TaskStore},
    },
};
use crate::config::BoardConfig;

/// Phase of the controller's loading state machine.
///
/// The happy path runs `Uninitialized → AwaitingAuth → Syncing → Ready`.
/// `Degraded` marks a failed realtime feed with stale reads retained, and
/// `Unavailable` marks a fatally missing backend configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// `start` has not been called.
    Uninitialized,
    /// Waiting for the identity provider to issue a session.
    AwaitingAuth,
    /// Subscription open, first snapshot not yet delivered.
    Syncing,
    /// Live snapshot is current.
    Ready,
    /// Realtime feed failed; the last known snapshot is served stale.
    Degraded,
    /// Backend connection not configured; the board feature is disabled.
    Unavailable,
}

/// Loading phase paired with a human-readable status message.
///
/// Messages are observability text for the embedding view, not error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    phase: SyncPhase,
    message: String,
}

impl SyncStatus {
    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Returns the human-readable status message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Owns the board's single realtime subscription and the current snapshot.
///
/// On every store notification the in-memory task list is replaced
/// wholesale; the store is trusted to deliver the full ordered result set
/// each time, so no partial merge happens at this layer. Retry and backoff
/// for a failed feed belong to the store's own subscription client, not
/// here.
pub struct SyncController {
    store: Arc<dyn TaskStore>,
    session: Option<SessionId>,
    subscription: Option<Subscription>,
    tasks: Vec<Task>,
    status: SyncStatus,
}

impl SyncController {
    /// Creates an uninitialized controller over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            session: None,
            subscription: None,
            tasks: Vec::new(),
            status: SyncStatus {
                phase: SyncPhase::Uninitialized,
                message: "not started".to_owned(),
            },
        }
    }

    /// Starts the controller: configuration gate, sign-in, then subscribe.
    ///
    /// A missing connection descriptor parks the controller in
    /// [`SyncPhase::Unavailable`] with a persistent message. A rejected
    /// sign-in is logged and leaves the controller in
    /// [`SyncPhase::AwaitingAuth`]; no second attempt is made here.
    pub async fn start(&mut self, config: &BoardConfig, identity: &dyn IdentityProvider) {
        if let Err(err) = config.connection() {
            warn!(error = %err, "board disabled");
            self.set_status(SyncPhase::Unavailable, err.to_string());
            return;
        }

        self.set_status(SyncPhase::AwaitingAuth, "waiting for sign-in");
        let attempt = match config.session_token() {
            Some(token) => identity.authenticate_with_token(token).await,
            None => identity.authenticate_anonymous().await,
        };
        match attempt {
            Ok(session) => {
                info!(session = %session, "signed in");
                self.session = Some(session);
                self.open_subscription(config);
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                self.status.message = format!("sign-in failed: {err}");
            }
        }
    }

    /// Opens the ordered subscription, closing any prior handle first.
    fn open_subscription(&mut self, config: &BoardConfig) {
        self.shutdown();
        match self
            .store
            .subscribe_ordered(&config.collection_path(), fields::CREATED_AT)
        {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.set_status(SyncPhase::Syncing, "loading tasks");
            }
            Err(err) => {
                warn!(error = %err, "realtime feed could not be opened");
                self.set_status(SyncPhase::Degraded, format!("realtime feed lost: {err}"));
            }
        }
    }

    /// Awaits and applies the next store notification.
    ///
    /// Returns `false` once the feed is closed and drained, or when no
    /// subscription is open.
    pub async fn process_next(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next_event().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    /// Applies every already-buffered notification without waiting.
    ///
    /// Returns the number of notifications applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self
            .subscription
            .as_mut()
            .and_then(Subscription::try_next_event)
        {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Applies a single store notification to the controller state.
    pub fn apply_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Snapshot(documents) => {
                self.tasks = documents.iter().map(Task::from_document).collect();
                self.set_status(SyncPhase::Ready, "connected");
            }
            StoreEvent::Failed(err) => {
                warn!(error = %err, "realtime feed failed; serving last known tasks");
                self.set_status(SyncPhase::Degraded, format!("realtime feed lost: {err}"));
            }
        }
    }

    /// Returns the current ordered snapshot.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Groups the current snapshot into status columns.
    #[must_use]
    pub fn columns(&self) -> BoardColumns {
        BoardColumns::group(&self.tasks)
    }

    /// Returns the current loading status.
    #[must_use]
    pub const fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Returns the authenticated session, once sign-in has succeeded.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Releases the subscription.
    ///
    /// Safe to call repeatedly; only the first call releases anything.
    pub fn shutdown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
            info!("board subscription released");
        }
    }

    fn set_status(&mut self, phase: SyncPhase, message: impl Into<String>) {
        self.status = SyncStatus {
            phase,
            message: message.into(),
        };
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
