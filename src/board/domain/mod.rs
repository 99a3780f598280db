//! Domain model for the collaborative task board.
//!
//! The board domain models the task entity, its cyclic status lifecycle,
//! the decode-time normalization of raw store documents, and column grouping,
//! while keeping all infrastructure concerns outside of the domain boundary.

mod columns;
mod document;
mod error;
mod ids;
mod status;
mod task;

pub use columns::BoardColumns;
pub use document::{Document, FieldMap, fields};
pub use error::TaskDomainError;
pub use ids::{CollectionPath, DocId, SessionId};
pub use status::TaskStatus;
pub use task::{StatusAdvance, Task};
