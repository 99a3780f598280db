//! In-memory adapters for multi-session board tests and local development.

mod identity;
mod store;

pub use identity::InMemoryIdentityProvider;
pub use store::InMemoryTaskStore;
