//! Document store use-case service.
//!
//! # Responsibility
//! - Own the in-memory task document and its persistence adapter.
//! - Enforce tab bounds and the active-tab pointer across every mutation.
//! - Persist the whole document synchronously after each state change.
//!
//! # Invariants
//! - Every failing operation leaves the document exactly as before the call,
//!   including when the persistence write itself fails.
//! - Operations that resolve nothing (unknown IDs, blank text) change nothing
//!   and write nothing.
//! - Task operations are scoped to the active tab only.

use crate::model::document::{
    Document, Subtask, SubtaskId, Tab, TabId, Task, TaskId, MAX_TABS,
};
use crate::model::factory::{new_subtask, new_tab, new_task};
use crate::repo::kv_repo::{KvStore, RepoError};
use crate::service::codec::{
    decode_document, deserialize_document, serialize_document, STORAGE_KEY,
};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Tab limit reached.
    CapacityExceeded { max: usize },
    /// Removing the tab would leave the document without tabs.
    LastTabProtected,
    /// Import candidate lacks required top-level fields.
    InvalidDocumentShape(String),
    /// Input is not JSON, or nested entities failed typed decoding.
    Parse(serde_json::Error),
    /// Persistence adapter failure.
    Storage(RepoError),
    /// File access failure during import/export.
    Io(std::io::Error),
}

impl StoreError {
    /// Returns whether this error is a blocking notice for the user rather
    /// than an infrastructure failure.
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::LastTabProtected
                | Self::InvalidDocumentShape(_)
                | Self::Parse(_)
        )
    }

    fn code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::LastTabProtected => "last_tab_protected",
            Self::InvalidDocumentShape(_) => "invalid_document_shape",
            Self::Parse(_) => "parse_failed",
            Self::Storage(_) => "storage_failed",
            Self::Io(_) => "io_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded { max } => write!(f, "max {max} tabs reached"),
            Self::LastTabProtected => write!(f, "you need at least one tab"),
            Self::InvalidDocumentShape(details) => write!(f, "invalid file: {details}"),
            Self::Parse(err) => write!(f, "invalid JSON: {err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Io(err) => write!(f, "file access failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Result of one mutation closure.
enum Change<T> {
    /// Document changed and must be persisted.
    Applied(T),
    /// Nothing resolved; document untouched.
    Unchanged(T),
}

/// Builds the document used when nothing usable is persisted.
pub fn create_document() -> Document {
    let tab = new_tab(1);
    Document {
        active_tab_id: tab.id,
        tabs: vec![tab],
    }
}

/// Owner of the task document and its persistence adapter.
pub struct DocumentStore<S: KvStore> {
    storage: S,
    document: Document,
}

impl<S: KvStore> DocumentStore<S> {
    /// Loads the persisted document or falls back to a fresh one.
    ///
    /// An absent or undecodable entry yields `create_document()`; the corrupt
    /// entry is left in place and only logged.
    ///
    /// # Errors
    /// - `Storage` when the adapter itself fails to read.
    pub fn load(storage: S) -> StoreResult<Self> {
        let document = match storage.read(STORAGE_KEY)? {
            Some(bytes) => match deserialize_document(&bytes) {
                Ok(document) => {
                    info!(
                        "event=document_load module=store status=ok tabs={}",
                        document.tabs.len()
                    );
                    document
                }
                Err(err) => {
                    warn!(
                        "event=document_load module=store status=fallback reason=decode_failed error_code={} error={err}",
                        err.code()
                    );
                    create_document()
                }
            },
            None => {
                info!("event=document_load module=store status=fallback reason=absent");
                create_document()
            }
        };

        Ok(Self { storage, document })
    }

    /// Wraps an existing document without touching storage.
    pub fn with_document(storage: S, document: Document) -> Self {
        Self { storage, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the active tab, or `None` when the document is unusable.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.document.active_tab()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the current document under the fixed key.
    pub fn save(&self) -> StoreResult<()> {
        let bytes = serialize_document(&self.document)?;
        self.storage.write(STORAGE_KEY, &bytes)?;
        Ok(())
    }

    /// Points the active tab at `tab_id` without checking that it exists.
    pub fn set_active_tab(&mut self, tab_id: TabId) -> StoreResult<()> {
        self.mutate("set_active_tab", |doc| {
            doc.active_tab_id = tab_id;
            Ok(Change::Applied(()))
        })
    }

    /// Appends a new tab and makes it active.
    ///
    /// # Errors
    /// - `CapacityExceeded` when `MAX_TABS` tabs already exist.
    pub fn add_tab(&mut self) -> StoreResult<TabId> {
        self.mutate("add_tab", |doc| {
            if doc.tabs.len() >= MAX_TABS {
                return Err(StoreError::CapacityExceeded { max: MAX_TABS });
            }
            let tab = new_tab(doc.tabs.len() + 1);
            let tab_id = tab.id;
            doc.tabs.push(tab);
            doc.active_tab_id = tab_id;
            Ok(Change::Applied(tab_id))
        })
    }

    /// Removes a tab with its tasks; re-activates the first tab if needed.
    ///
    /// Returns `false` when no tab matched.
    ///
    /// # Errors
    /// - `LastTabProtected` when only one tab exists.
    pub fn remove_tab(&mut self, tab_id: TabId) -> StoreResult<bool> {
        self.mutate("remove_tab", |doc| {
            if doc.tabs.len() == 1 {
                return Err(StoreError::LastTabProtected);
            }
            let Some(index) = doc.tabs.iter().position(|tab| tab.id == tab_id) else {
                return Ok(Change::Unchanged(false));
            };
            doc.tabs.remove(index);
            if doc.active_tab().is_none() {
                doc.active_tab_id = doc.tabs[0].id;
            }
            Ok(Change::Applied(true))
        })
    }

    /// Renames a tab; a blank name keeps the previous one.
    pub fn rename_tab(&mut self, tab_id: TabId, name: &str) -> StoreResult<bool> {
        let name = name.trim();
        self.mutate("rename_tab", |doc| {
            match doc.tab_mut(tab_id) {
                Some(tab) if !name.is_empty() => {
                    tab.name = name.to_string();
                    Ok(Change::Applied(true))
                }
                _ => Ok(Change::Unchanged(false)),
            }
        })
    }

    /// Inserts a new task at the top of the active tab.
    ///
    /// Returns `None` for blank text.
    pub fn add_task(&mut self, text: &str) -> StoreResult<Option<TaskId>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.mutate("add_task", |doc| {
            let Some(tab) = doc.active_tab_mut() else {
                return Ok(Change::Unchanged(None));
            };
            let task = new_task(text);
            let task_id = task.id;
            tab.tasks.insert(0, task);
            Ok(Change::Applied(Some(task_id)))
        })
    }

    /// Replaces task text as given (no trimming).
    pub fn update_task_text(&mut self, task_id: TaskId, text: &str) -> StoreResult<bool> {
        self.with_task("update_task_text", task_id, |task| task.text = text.to_string())
    }

    pub fn set_task_done(&mut self, task_id: TaskId, done: bool) -> StoreResult<bool> {
        self.with_task("set_task_done", task_id, |task| task.done = done)
    }

    /// Sets the color tag; the value is stored unvalidated.
    pub fn set_task_color(&mut self, task_id: TaskId, color: &str) -> StoreResult<bool> {
        self.with_task("set_task_color", task_id, |task| task.color = color.to_string())
    }

    /// Removes a task and its subtasks from the active tab.
    pub fn delete_task(&mut self, task_id: TaskId) -> StoreResult<bool> {
        self.mutate("delete_task", |doc| {
            let Some(tab) = doc.active_tab_mut() else {
                return Ok(Change::Unchanged(false));
            };
            let Some(index) = tab.task_position(task_id) else {
                return Ok(Change::Unchanged(false));
            };
            tab.tasks.remove(index);
            Ok(Change::Applied(true))
        })
    }

    /// Appends a subtask to a task of the active tab.
    ///
    /// Returns `None` for blank text or an unknown task.
    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> StoreResult<Option<SubtaskId>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.mutate("add_subtask", |doc| {
            let Some(task) = doc
                .active_tab_mut()
                .and_then(|tab| tab.task_mut(task_id))
            else {
                return Ok(Change::Unchanged(None));
            };
            let subtask = new_subtask(text);
            let subtask_id = subtask.id;
            task.subtasks.push(subtask);
            Ok(Change::Applied(Some(subtask_id)))
        })
    }

    pub fn update_subtask_text(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        text: &str,
    ) -> StoreResult<bool> {
        self.with_subtask("update_subtask_text", task_id, subtask_id, |subtask| {
            subtask.text = text.to_string()
        })
    }

    pub fn set_subtask_done(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        done: bool,
    ) -> StoreResult<bool> {
        self.with_subtask("set_subtask_done", task_id, subtask_id, |subtask| {
            subtask.done = done
        })
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> StoreResult<bool> {
        self.mutate("delete_subtask", |doc| {
            let Some(task) = doc
                .active_tab_mut()
                .and_then(|tab| tab.task_mut(task_id))
            else {
                return Ok(Change::Unchanged(false));
            };
            let Some(index) = task.subtasks.iter().position(|s| s.id == subtask_id) else {
                return Ok(Change::Unchanged(false));
            };
            task.subtasks.remove(index);
            Ok(Change::Applied(true))
        })
    }

    /// Moves `moved` to the position currently held by `target`.
    ///
    /// Both tasks must live in the active tab; cross-tab moves are ignored.
    pub fn reorder_task(&mut self, moved: TaskId, target: TaskId) -> StoreResult<bool> {
        self.mutate("reorder_task", |doc| {
            let Some(tab) = doc.active_tab_mut() else {
                return Ok(Change::Unchanged(false));
            };
            let (Some(from), Some(to)) = (tab.task_position(moved), tab.task_position(target))
            else {
                return Ok(Change::Unchanged(false));
            };
            if from == to {
                return Ok(Change::Unchanged(false));
            }
            let task = tab.tasks.remove(from);
            tab.tasks.insert(to, task);
            Ok(Change::Applied(true))
        })
    }

    /// Replaces the whole document with an import candidate.
    ///
    /// Only the top-level shape is checked; an active pointer that does not
    /// resolve is accepted and logged.
    ///
    /// # Errors
    /// - `InvalidDocumentShape` when `tabs` or `activeTabId` is missing.
    /// - `Parse` when nested entities fail typed decoding.
    pub fn replace_document(&mut self, candidate: Value) -> StoreResult<()> {
        let replacement = match decode_document(candidate) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    "event=document_replace module=store status=rejected error_code={} error={err}",
                    err.code()
                );
                return Err(err);
            }
        };
        if !replacement.is_consistent() {
            warn!(
                "event=document_replace module=store status=inconsistent tabs={}",
                replacement.tabs.len()
            );
        }
        self.mutate("replace_document", move |doc| {
            *doc = replacement;
            Ok(Change::Applied(()))
        })
    }

    /// Parses JSON text and replaces the document with it.
    pub fn import_json(&mut self, text: &str) -> StoreResult<()> {
        let candidate: Value = serde_json::from_str(text).map_err(|err| {
            warn!("event=document_import module=store status=rejected error_code=parse_failed error={err}");
            StoreError::from(err)
        })?;
        self.replace_document(candidate)
    }

    fn with_task(
        &mut self,
        op: &'static str,
        task_id: TaskId,
        apply: impl FnOnce(&mut Task),
    ) -> StoreResult<bool> {
        self.mutate(op, |doc| {
            match doc.active_tab_mut().and_then(|tab| tab.task_mut(task_id)) {
                Some(task) => {
                    apply(task);
                    Ok(Change::Applied(true))
                }
                None => Ok(Change::Unchanged(false)),
            }
        })
    }

    fn with_subtask(
        &mut self,
        op: &'static str,
        task_id: TaskId,
        subtask_id: SubtaskId,
        apply: impl FnOnce(&mut Subtask),
    ) -> StoreResult<bool> {
        self.mutate(op, |doc| {
            match doc
                .active_tab_mut()
                .and_then(|tab| tab.task_mut(task_id))
                .and_then(|task| task.subtask_mut(subtask_id))
            {
                Some(subtask) => {
                    apply(subtask);
                    Ok(Change::Applied(true))
                }
                None => Ok(Change::Unchanged(false)),
            }
        })
    }

    fn mutate<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(&mut Document) -> StoreResult<Change<T>>,
    ) -> StoreResult<T> {
        let snapshot = self.document.clone();
        match apply(&mut self.document) {
            Ok(Change::Unchanged(value)) => {
                debug!("event=store_mutation module=store status=noop op={op}");
                Ok(value)
            }
            Ok(Change::Applied(value)) => {
                if let Err(err) = self.save() {
                    self.document = snapshot;
                    error!(
                        "event=store_mutation module=store status=error op={op} error_code={} error={err}",
                        err.code()
                    );
                    return Err(err);
                }
                debug!(
                    "event=store_mutation module=store status=ok op={op} tabs={}",
                    self.document.tabs.len()
                );
                Ok(value)
            }
            Err(err) => {
                self.document = snapshot;
                warn!(
                    "event=store_mutation module=store status=rejected op={op} error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }
}
