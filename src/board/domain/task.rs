//! Task entity, document decoding, and status-advance planning.

use super::{DocId, Document, SessionId, TaskStatus, fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A board task decoded from a store document.
///
/// Decoding is total: malformed documents normalize to a displayable task
/// rather than failing, so a single corrupt record can never take down the
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: DocId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: Option<SessionId>,
    created_by: Option<SessionId>,
    created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Decodes a raw store document into a task.
    ///
    /// Unknown or missing `status` values fall back to [`TaskStatus::Todo`];
    /// a pending server timestamp decodes as `None`.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.text_field(fields::TITLE).unwrap_or_default().to_owned(),
            description: doc
                .text_field(fields::DESCRIPTION)
                .filter(|text| !text.is_empty())
                .map(ToOwned::to_owned),
            status: TaskStatus::from_raw(doc.text_field(fields::STATUS)),
            assigned_to: doc.text_field(fields::ASSIGNED_TO).map(SessionId::new),
            created_by: doc.text_field(fields::CREATED_BY).map(SessionId::new),
            created_at: doc
                .fields
                .get(fields::CREATED_AT)
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }

    /// Returns the store-assigned task identifier.
    #[must_use]
    pub const fn id(&self) -> &DocId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if one was provided.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the normalized workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned session, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&SessionId> {
        self.assigned_to.as_ref()
    }

    /// Returns the creating session, when the document recorded one.
    #[must_use]
    pub const fn created_by(&self) -> Option<&SessionId> {
        self.created_by.as_ref()
    }

    /// Returns the server-assigned creation timestamp.
    ///
    /// `None` while the server timestamp has not yet materialised; snapshot
    /// ordering remains the store's responsibility either way.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Plans the next status advance for this task as performed by `actor`.
    #[must_use]
    pub fn plan_advance(&self, actor: &SessionId) -> StatusAdvance {
        StatusAdvance::compute(self.status, self.assigned_to.as_ref(), actor)
    }
}

/// Outcome of advancing a task one step through the workflow cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAdvance {
    /// Status to write.
    pub next_status: TaskStatus,
    /// Assignee to write, or `None` when the field must stay untouched.
    pub next_assignee: Option<SessionId>,
}

impl StatusAdvance {
    /// Computes the one-step advance for the given status and assignee.
    ///
    /// The only assignment side effect is on `todo → in_progress` with no
    /// current assignee: the acting session claims the task. Every other
    /// transition leaves the assignee field untouched. The computation has no
    /// awareness of concurrent writers; conflicting advances are resolved by
    /// the store's last-writer-wins field semantics.
    #[must_use]
    pub fn compute(
        current: TaskStatus,
        assignee: Option<&SessionId>,
        actor: &SessionId,
    ) -> Self {
        let next_status = current.advanced();
        let next_assignee = match (current, assignee) {
            (TaskStatus::Todo, None) => Some(actor.clone()),
            _ => None,
        };
        Self {
            next_status,
            next_assignee,
        }
    }
}
