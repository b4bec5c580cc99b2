//! File import/export for whole documents.
//!
//! # Responsibility
//! - Write the current document as a pretty-printed JSON file.
//! - Read a user-selected file and hand it to the store for replacement.
//!
//! # Invariants
//! - A rejected import leaves the current document and its persisted entry
//!   untouched.
//! - Export never writes a partially written target; content goes to a
//!   sibling temp file first and is renamed into place.

use crate::repo::kv_repo::KvStore;
use crate::service::codec::serialize_document_pretty;
use crate::service::document_store::{DocumentStore, StoreResult};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Base file name for exports.
pub const EXPORT_FILE_NAME: &str = "zendo-export.json";

/// Exports into `dir` using the fixed export file name.
pub fn export_to_dir<S: KvStore>(store: &DocumentStore<S>, dir: &Path) -> StoreResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    export_to_path(store, &path)?;
    Ok(path)
}

/// Exports the current document to `path`.
pub fn export_to_path<S: KvStore>(store: &DocumentStore<S>, path: &Path) -> StoreResult<()> {
    let content = serialize_document_pretty(store.document())?;
    atomic_write(path, content.as_bytes())?;
    info!(
        "event=document_export module=transfer status=ok tabs={} bytes={}",
        store.document().tabs.len(),
        content.len()
    );
    Ok(())
}

/// Imports `path`, replacing and persisting the document on success.
///
/// # Errors
/// - `Io` when the file cannot be read as UTF-8 text.
/// - `Parse` / `InvalidDocumentShape` when the content is rejected.
pub fn import_from_path<S: KvStore>(store: &mut DocumentStore<S>, path: &Path) -> StoreResult<()> {
    let text = fs::read_to_string(path).map_err(|err| {
        warn!("event=document_import module=transfer status=error error_code=io_failed error={err}");
        err
    })?;
    store.import_json(&text)?;
    info!(
        "event=document_import module=transfer status=ok tabs={}",
        store.document().tabs.len()
    );
    Ok(())
}

fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)
}
