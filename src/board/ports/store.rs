//! Store port for task persistence and realtime snapshot subscriptions.

use crate::board::domain::{CollectionPath, DocId, Document, FieldMap};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Field-map key marking a value the store must replace with its own clock
/// at write time.
pub const SERVER_TIMESTAMP_KEY: &str = "__server_timestamp__";

/// Returns the opaque sentinel standing in for a server-assigned timestamp.
#[must_use]
pub fn server_timestamp_sentinel() -> Value {
    json!({ SERVER_TIMESTAMP_KEY: true })
}

/// Returns `true` when a field value is the server-timestamp sentinel.
#[must_use]
pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key(SERVER_TIMESTAMP_KEY))
}

/// Document persistence and realtime subscription contract.
///
/// Mutations are asynchronous and non-cancellable once issued. After any
/// accepted mutation the store re-delivers the full ordered result set to
/// every live subscriber.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a new document and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the write is rejected.
    async fn insert(&self, collection: &CollectionPath, fields: FieldMap) -> StoreResult<DocId>;

    /// Merges a partial field patch into an existing document.
    ///
    /// Patched fields overwrite stored values key by key; unpatched fields
    /// are untouched. Concurrent patches resolve last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document does not exist, or
    /// [`StoreError::Backend`] when the write is rejected.
    async fn update_fields(
        &self,
        collection: &CollectionPath,
        id: &DocId,
        patch: FieldMap,
    ) -> StoreResult<()>;

    /// Deletes a document.
    ///
    /// Deleting an absent document is a no-op, so a confirmed delete is safe
    /// to issue without re-checking existence.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the write is rejected.
    async fn remove(&self, collection: &CollectionPath, id: &DocId) -> StoreResult<()>;

    /// Opens a realtime subscription to the collection ordered by
    /// `order_key` ascending, ties broken by insertion order.
    ///
    /// The initial snapshot is delivered immediately; every accepted
    /// mutation re-delivers the full ordered result set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Subscription`] when the feed cannot be opened.
    fn subscribe_ordered(
        &self,
        collection: &CollectionPath,
        order_key: &str,
    ) -> StoreResult<Subscription>;

    /// Returns the opaque orderable value standing in for the store clock.
    ///
    /// Used only as the `createdAt` value at insert time.
    fn server_timestamp(&self) -> Value {
        server_timestamp_sentinel()
    }
}

/// A single notification from an open subscription.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Full ordered result set after initial subscribe or any mutation.
    Snapshot(Vec<Document>),
    /// The realtime feed failed; no further snapshots will arrive.
    Failed(StoreError),
}

/// Handle to an open realtime subscription.
///
/// Closing releases the store-side registration exactly once; a second
/// [`close`](Self::close) and the implicit close on drop are no-ops.
/// Events already buffered before the close may still be drained.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<StoreEvent>,
    closer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription handle from an event channel and a release
    /// action invoked on first close.
    #[must_use]
    pub fn new(
        events: mpsc::UnboundedReceiver<StoreEvent>,
        closer: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            closer: Some(Box::new(closer)),
        }
    }

    /// Awaits the next store notification.
    ///
    /// Returns `None` once the feed is closed and drained.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        self.events.recv().await
    }

    /// Returns the next already-buffered notification without waiting.
    #[must_use]
    pub fn try_next_event(&mut self) -> Option<StoreEvent> {
        self.events.try_recv().ok()
    }

    /// Releases the store-side registration.
    pub fn close(&mut self) {
        if let Some(release) = self.closer.take() {
            release();
        }
    }

    /// Returns `true` once the subscription has been released.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closer.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found: {0}")]
    NotFound(DocId),

    /// The realtime feed failed or could not be opened.
    #[error("realtime feed failed: {0}")]
    Subscription(String),

    /// Backend-level write or connectivity failure.
    #[error("backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
