//! Task document domain model.
//!
//! # Responsibility
//! - Define the serializable tab/task/subtask tree.
//! - Construct new entities with fresh identifiers and defaults.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID that is never reused.
//! - Deletion removes the whole subtree; there are no tombstones.

pub mod document;
pub mod factory;
