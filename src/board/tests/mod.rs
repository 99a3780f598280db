//! Unit tests for the board module.

mod columns_tests;
mod compose_tests;
mod status_tests;
mod sync_tests;

use crate::board::domain::{DocId, Document};
use serde_json::Value;

/// Builds a document from a `json!` object literal.
pub(crate) fn make_document(id: &str, value: &Value) -> Document {
    let fields = value.as_object().cloned().unwrap_or_default();
    Document::new(DocId::new(id), fields)
}
