//! Core use-case services.
//!
//! # Responsibility
//! - Own the task document and enforce its invariants.
//! - Keep view layers decoupled from storage and wire-format details.

pub mod codec;
pub mod command;
pub mod document_store;
pub mod transfer;
