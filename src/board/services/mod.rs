//! Application services orchestrating the task board.

mod compose;
mod mutation;
mod sync;

pub use compose::TaskComposer;
pub use mutation::{BoardService, ConfirmedDeletion, MutationError, MutationResult};
pub use sync::{SyncController, SyncPhase, SyncStatus};
