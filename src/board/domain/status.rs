//! Cyclic three-state task status with fail-closed decoding.

use serde::{Deserialize, Serialize};

/// Workflow status of a board task.
///
/// The workflow is a cycle with exactly one outgoing transition per state:
/// `Todo → InProgress → Done → Todo`. There is no terminal state; advancing
/// a `Done` task reopens it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the next status in the workflow cycle.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }

    /// Decodes a raw stored status value, failing closed.
    ///
    /// Any absent, malformed, or unrecognized value is treated as [`Todo`]
    /// so that a corrupt document can never break display or transition
    /// logic.
    ///
    /// [`Todo`]: Self::Todo
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(value) = raw else {
            return Self::Todo;
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "in_progress" => Self::InProgress,
            "done" => Self::Done,
            _ => Self::Todo,
        }
    }
}
