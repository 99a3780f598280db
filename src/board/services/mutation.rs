//! Mutation operations exposed to the presentation layer.
//!
//! Failure severity is deliberately tiered: add-task failures propagate to
//! the caller for user-visible surfacing, while status advances and deletes
//! are idempotent and cheaply retryable by re-clicking, so their failures
//! are logged and swallowed.

use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::warn;

use crate::board::{
    domain::{CollectionPath, DocId, FieldMap, SessionId, Task, TaskDomainError, TaskStatus, fields},
    ports::store::{StoreError, TaskStore},
};

/// Result type for board mutations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors returned by board mutations.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Domain validation failed before any store call.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// An add-task submission is already in flight.
    #[error("a task submission is already in flight")]
    SubmissionInFlight,

    /// The store rejected the mutation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Confirmation token for a task deletion.
///
/// Constructing one records that the user explicitly confirmed the delete;
/// [`BoardService::delete_task`] accepts nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDeletion(DocId);

impl ConfirmedDeletion {
    /// Records the user's confirmation to delete the given task.
    #[must_use]
    pub const fn confirm(id: DocId) -> Self {
        Self(id)
    }

    /// Returns the task to delete.
    #[must_use]
    pub const fn id(&self) -> &DocId {
        &self.0
    }
}

/// Board mutations acting on behalf of one authenticated session.
pub struct BoardService {
    store: Arc<dyn TaskStore>,
    collection: CollectionPath,
    session: SessionId,
    submitting: AtomicBool,
}

impl BoardService {
    /// Creates a mutation service for the given session.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, collection: CollectionPath, session: SessionId) -> Self {
        Self {
            store,
            collection,
            session,
            submitting: AtomicBool::new(false),
        }
    }

    /// Returns the acting session.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Creates a new task in the `todo` column.
    ///
    /// Rejects before any store call when the trimmed title is empty or a
    /// submission is already in flight. The new document carries
    /// `status = todo`, no assignee, the acting session as creator, and the
    /// store's server timestamp as `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`],
    /// [`MutationError::SubmissionInFlight`], or the store failure for the
    /// caller to surface to the user.
    pub async fn add_task(&self, title: &str, description: &str) -> MutationResult<DocId> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle.into());
        }
        let _guard = SubmitGuard::acquire(&self.submitting)?;

        let mut doc = FieldMap::new();
        doc.insert(fields::TITLE.to_owned(), Value::String(trimmed.to_owned()));
        doc.insert(
            fields::DESCRIPTION.to_owned(),
            Value::String(description.trim().to_owned()),
        );
        doc.insert(
            fields::STATUS.to_owned(),
            Value::String(TaskStatus::Todo.as_str().to_owned()),
        );
        doc.insert(fields::ASSIGNED_TO.to_owned(), Value::Null);
        doc.insert(
            fields::CREATED_BY.to_owned(),
            Value::String(self.session.as_str().to_owned()),
        );
        doc.insert(fields::CREATED_AT.to_owned(), self.store.server_timestamp());

        let id = self.store.insert(&self.collection, doc).await?;
        Ok(id)
    }

    /// Advances a task one step through the workflow cycle.
    ///
    /// Issues a single field-level patch covering `status` and, only when
    /// the advance claims the task, `assignedTo`. Concurrent advances from
    /// other sessions resolve last-writer-wins at the store; no task-level
    /// locking exists. Failures are logged and not surfaced further.
    pub async fn advance_status(&self, task: &Task) {
        let plan = task.plan_advance(&self.session);
        let mut patch = FieldMap::new();
        patch.insert(
            fields::STATUS.to_owned(),
            Value::String(plan.next_status.as_str().to_owned()),
        );
        if let Some(assignee) = plan.next_assignee {
            patch.insert(
                fields::ASSIGNED_TO.to_owned(),
                Value::String(assignee.as_str().to_owned()),
            );
        }

        if let Err(err) = self
            .store
            .update_fields(&self.collection, task.id(), patch)
            .await
        {
            warn!(task_id = %task.id(), error = %err, "status advance failed");
        }
    }

    /// Deletes a confirmed task.
    ///
    /// Deletion is immediate and permanent; an already-deleted task is a
    /// no-op. Failures are logged and not surfaced further.
    pub async fn delete_task(&self, deletion: ConfirmedDeletion) {
        if let Err(err) = self.store.remove(&self.collection, deletion.id()).await {
            warn!(task_id = %deletion.id(), error = %err, "task delete failed");
        }
    }
}

/// Single-submission gate held for the duration of an add-task call.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> MutationResult<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| MutationError::SubmissionInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
