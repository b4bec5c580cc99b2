//! Persistence adapter abstractions and implementations.
//!
//! # Responsibility
//! - Define the key-value contract the document store persists through.
//! - Isolate SQLite query details from store orchestration.

pub mod kv_repo;
