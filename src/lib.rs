//! Studyboard: collaborative kanban-style study task board core.
//!
//! This crate provides the domain model, synchronization controller, and
//! mutation services behind a shared three-column task board. Persistence,
//! realtime fan-out, and authentication are delegated to external
//! collaborators expressed as ports.
//!
//! # Architecture
//!
//! Studyboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (backends, test doubles)
//!
//! # Modules
//!
//! - [`board`]: Task lifecycle, snapshot synchronization, and mutations
//! - [`config`]: Backend connection descriptor and tenant namespacing

pub mod board;
pub mod config;
