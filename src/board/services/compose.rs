//! Input buffers and submission gating for the add-task form.

use super::mutation::{BoardService, MutationResult};
use crate::board::domain::DocId;

/// Title and description buffers backing the add-task form.
///
/// Buffers clear only after a successful submission; any rejection or store
/// failure leaves them intact so the user can retry without retyping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskComposer {
    title: String,
    description: String,
}

impl TaskComposer {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title buffer.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the description buffer.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Returns the current title buffer.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the current description buffer.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Submits the buffered draft as a new task.
    ///
    /// A returned identifier doubles as the "task added" signal for the
    /// embedding view.
    ///
    /// # Errors
    ///
    /// Propagates the rejection or store failure from
    /// [`BoardService::add_task`]; buffers are retained for retry.
    pub async fn submit(&mut self, board: &BoardService) -> MutationResult<DocId> {
        let id = board.add_task(&self.title, &self.description).await?;
        self.title.clear();
        self.description.clear();
        Ok(id)
    }
}
