//! Collaborative task board: lifecycle, synchronization, and mutations.
//!
//! Tasks move through a cyclic three-state workflow
//! (`todo → in_progress → done → todo`) and every connected session observes
//! the same ordered snapshot through a realtime subscription. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
