//! Domain types, error taxonomy, and the credential injection engine.
//!
//! This crate is pure logic: no database, no network, no process spawning.
//! The heavier collaborators (catalog store, membership gate, lifecycle
//! manager) live in `botforge-provision`.

pub mod error;
pub mod inject;
pub mod types;
