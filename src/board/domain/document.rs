//! Raw store document representation shared by ports and adapters.

use super::DocId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unordered field map of a store document, keyed by wire field name.
pub type FieldMap = serde_json::Map<String, Value>;

/// Wire field names of the task document schema.
pub mod fields {
    /// Task title, set at creation and immutable afterwards.
    pub const TITLE: &str = "title";
    /// Optional free-text description.
    pub const DESCRIPTION: &str = "description";
    /// Workflow status (`todo`, `in_progress`, or `done`).
    pub const STATUS: &str = "status";
    /// Session the task was assigned to, or null.
    pub const ASSIGNED_TO: &str = "assignedTo";
    /// Session that created the task.
    pub const CREATED_BY: &str = "createdBy";
    /// Server-assigned creation timestamp; the sole ordering key.
    pub const CREATED_AT: &str = "createdAt";
}

/// A single document as delivered by the store.
///
/// Field values are untrusted: decoding into a [`Task`](super::Task)
/// normalizes whatever shape the store returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned document identifier.
    pub id: DocId,
    /// Raw document fields.
    pub fields: FieldMap,
}

impl Document {
    /// Creates a document from an identifier and raw fields.
    #[must_use]
    pub const fn new(id: DocId, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    /// Returns the string value of a field, when present and textual.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
