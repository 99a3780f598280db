//! Unit tests for the cyclic status workflow and fail-closed decoding.

use crate::board::domain::TaskStatus;
use rstest::rstest;

#[rstest]
#[case(TaskStatus::Todo, TaskStatus::InProgress)]
#[case(TaskStatus::InProgress, TaskStatus::Done)]
#[case(TaskStatus::Done, TaskStatus::Todo)]
fn advanced_follows_the_workflow_cycle(#[case] current: TaskStatus, #[case] next: TaskStatus) {
    assert_eq!(current.advanced(), next);
}

#[rstest]
fn three_advances_return_to_the_starting_status() {
    for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
        assert_eq!(status.advanced().advanced().advanced(), status);
    }
}

#[rstest]
#[case(Some("todo"), TaskStatus::Todo)]
#[case(Some("in_progress"), TaskStatus::InProgress)]
#[case(Some("done"), TaskStatus::Done)]
#[case(Some(" DONE "), TaskStatus::Done)]
#[case(Some("In_Progress"), TaskStatus::InProgress)]
fn from_raw_accepts_known_values(#[case] raw: Option<&str>, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::from_raw(raw), expected);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("blocked"))]
#[case(Some("archived"))]
#[case(Some("42"))]
fn from_raw_fails_closed_to_todo(#[case] raw: Option<&str>) {
    assert_eq!(TaskStatus::from_raw(raw), TaskStatus::Todo);
}

#[rstest]
fn canonical_representation_round_trips(
    #[values(TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done)] status: TaskStatus,
) {
    assert_eq!(TaskStatus::from_raw(Some(status.as_str())), status);
}
