//! Core domain logic for ZenDo.
//! This crate is the single source of truth for task document invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::document::{
    Document, Subtask, SubtaskId, Tab, TabId, Task, TaskId, DEFAULT_TASK_COLOR, MAX_TABS,
};
pub use model::factory::{new_subtask, new_tab, new_task};
pub use repo::kv_repo::{KvStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::codec::{
    deserialize_document, serialize_document, serialize_document_pretty, STORAGE_KEY,
};
pub use service::command::{Command, CommandOutcome};
pub use service::document_store::{create_document, DocumentStore, StoreError, StoreResult};
pub use service::transfer::{export_to_dir, export_to_path, import_from_path, EXPORT_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
