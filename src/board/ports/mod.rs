//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod identity;
pub mod store;

pub use identity::{IdentityError, IdentityProvider, IdentityResult};
pub use store::{StoreError, StoreEvent, StoreResult, Subscription, TaskStore};
