//! Status-column grouping of an ordered task snapshot.

use super::{Task, TaskStatus};

/// A snapshot grouped into the three status columns.
///
/// Grouping preserves the snapshot's incoming order within each column, so
/// every column stays sorted by creation time without re-sorting on the
/// client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    todo: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl BoardColumns {
    /// Groups an ordered snapshot by normalized status.
    #[must_use]
    pub fn group(tasks: &[Task]) -> Self {
        let mut columns = Self::default();
        for task in tasks {
            match task.status() {
                TaskStatus::Todo => columns.todo.push(task.clone()),
                TaskStatus::InProgress => columns.in_progress.push(task.clone()),
                TaskStatus::Done => columns.done.push(task.clone()),
            }
        }
        columns
    }

    /// Returns the tasks in the given column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Returns the `todo` column.
    #[must_use]
    pub fn todo(&self) -> &[Task] {
        &self.todo
    }

    /// Returns the `in_progress` column.
    #[must_use]
    pub fn in_progress(&self) -> &[Task] {
        &self.in_progress
    }

    /// Returns the `done` column.
    #[must_use]
    pub fn done(&self) -> &[Task] {
        &self.done
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
