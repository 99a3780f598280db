//! Unit tests for status-column grouping.

use super::make_document;
use crate::board::domain::{BoardColumns, Task, TaskStatus};
use rstest::rstest;
use serde_json::json;

fn snapshot() -> Vec<Task> {
    [
        ("doc-1", json!({ "title": "Read ch.4", "status": "todo" })),
        ("doc-2", json!({ "title": "Quiz prep", "status": "in_progress" })),
        ("doc-3", json!({ "title": "Summary", "status": "done" })),
        ("doc-4", json!({ "title": "Flashcards", "status": "todo" })),
        ("doc-5", json!({ "title": "Corrupted", "status": "archived" })),
    ]
    .iter()
    .map(|(id, fields)| Task::from_document(&make_document(id, fields)))
    .collect()
}

#[rstest]
fn groups_by_normalized_status() {
    let columns = BoardColumns::group(&snapshot());

    let todo_ids: Vec<&str> = columns.todo().iter().map(|task| task.id().as_str()).collect();
    // doc-5 has an unknown status and falls into the todo column.
    assert_eq!(todo_ids, ["doc-1", "doc-4", "doc-5"]);

    let in_progress_ids: Vec<&str> = columns
        .in_progress()
        .iter()
        .map(|task| task.id().as_str())
        .collect();
    assert_eq!(in_progress_ids, ["doc-2"]);

    let done_ids: Vec<&str> = columns.done().iter().map(|task| task.id().as_str()).collect();
    assert_eq!(done_ids, ["doc-3"]);
}

#[rstest]
fn column_accessor_matches_named_getters() {
    let columns = BoardColumns::group(&snapshot());
    assert_eq!(columns.column(TaskStatus::Todo), columns.todo());
    assert_eq!(columns.column(TaskStatus::InProgress), columns.in_progress());
    assert_eq!(columns.column(TaskStatus::Done), columns.done());
}

#[rstest]
fn grouping_preserves_snapshot_order_within_each_column() {
    let columns = BoardColumns::group(&snapshot());
    let todo_titles: Vec<&str> = columns.todo().iter().map(Task::title).collect();
    assert_eq!(todo_titles, ["Read ch.4", "Flashcards", "Corrupted"]);
}

#[rstest]
fn counts_span_all_columns() {
    let columns = BoardColumns::group(&snapshot());
    assert_eq!(columns.len(), 5);
    assert!(!columns.is_empty());

    let empty = BoardColumns::group(&[]);
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
}
