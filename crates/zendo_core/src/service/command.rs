//! User intents consumed by the document store.
//!
//! # Responsibility
//! - Enumerate every mutating intent a view layer may emit.
//! - Dispatch intents onto `DocumentStore` operations.
//!
//! # Invariants
//! - View layers translate raw input into `Command`s only; invariant
//!   enforcement stays inside the store.
//! - Confirmation gates are a view-layer duty signalled by
//!   `Command::requires_confirmation`.

use crate::model::document::{SubtaskId, TabId, TaskId};
use crate::repo::kv_repo::KvStore;
use crate::service::document_store::{DocumentStore, StoreResult};
use log::debug;
use uuid::Uuid;

/// Mutating intent emitted by a view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetActiveTab { tab_id: TabId },
    AddTab,
    RemoveTab { tab_id: TabId },
    RenameTab { tab_id: TabId, name: String },
    AddTask { text: String },
    UpdateTaskText { task_id: TaskId, text: String },
    SetTaskDone { task_id: TaskId, done: bool },
    SetTaskColor { task_id: TaskId, color: String },
    DeleteTask { task_id: TaskId },
    AddSubtask { task_id: TaskId, text: String },
    UpdateSubtaskText {
        task_id: TaskId,
        subtask_id: SubtaskId,
        text: String,
    },
    SetSubtaskDone {
        task_id: TaskId,
        subtask_id: SubtaskId,
        done: bool,
    },
    DeleteSubtask {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },
    /// Drop of `moved` onto `target`, both in the active tab.
    ReorderTask { moved: TaskId, target: TaskId },
}

impl Command {
    /// Returns whether the view layer must ask the user before dispatch.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::RemoveTab { .. } | Self::DeleteTask { .. })
    }

    /// Stable snake_case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetActiveTab { .. } => "set_active_tab",
            Self::AddTab => "add_tab",
            Self::RemoveTab { .. } => "remove_tab",
            Self::RenameTab { .. } => "rename_tab",
            Self::AddTask { .. } => "add_task",
            Self::UpdateTaskText { .. } => "update_task_text",
            Self::SetTaskDone { .. } => "set_task_done",
            Self::SetTaskColor { .. } => "set_task_color",
            Self::DeleteTask { .. } => "delete_task",
            Self::AddSubtask { .. } => "add_subtask",
            Self::UpdateSubtaskText { .. } => "update_subtask_text",
            Self::SetSubtaskDone { .. } => "set_subtask_done",
            Self::DeleteSubtask { .. } => "delete_subtask",
            Self::ReorderTask { .. } => "reorder_task",
        }
    }
}

/// What a dispatched command did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Document changed and was persisted.
    Applied,
    /// A new entity was created and persisted.
    Created(Uuid),
    /// Nothing resolved (unknown IDs, blank text); document unchanged.
    Ignored,
}

impl From<bool> for CommandOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Ignored
        }
    }
}

impl From<Option<Uuid>> for CommandOutcome {
    fn from(created: Option<Uuid>) -> Self {
        created.map_or(Self::Ignored, Self::Created)
    }
}

impl<S: KvStore> DocumentStore<S> {
    /// Dispatches one command onto the matching store operation.
    pub fn apply(&mut self, command: Command) -> StoreResult<CommandOutcome> {
        debug!("event=command_dispatch module=store op={}", command.name());
        let outcome: CommandOutcome = match command {
            Command::SetActiveTab { tab_id } => {
                self.set_active_tab(tab_id)?;
                CommandOutcome::Applied
            }
            Command::AddTab => CommandOutcome::Created(self.add_tab()?),
            Command::RemoveTab { tab_id } => self.remove_tab(tab_id)?.into(),
            Command::RenameTab { tab_id, name } => self.rename_tab(tab_id, &name)?.into(),
            Command::AddTask { text } => self.add_task(&text)?.into(),
            Command::UpdateTaskText { task_id, text } => {
                self.update_task_text(task_id, &text)?.into()
            }
            Command::SetTaskDone { task_id, done } => self.set_task_done(task_id, done)?.into(),
            Command::SetTaskColor { task_id, color } => {
                self.set_task_color(task_id, &color)?.into()
            }
            Command::DeleteTask { task_id } => self.delete_task(task_id)?.into(),
            Command::AddSubtask { task_id, text } => self.add_subtask(task_id, &text)?.into(),
            Command::UpdateSubtaskText {
                task_id,
                subtask_id,
                text,
            } => self.update_subtask_text(task_id, subtask_id, &text)?.into(),
            Command::SetSubtaskDone {
                task_id,
                subtask_id,
                done,
            } => self.set_subtask_done(task_id, subtask_id, done)?.into(),
            Command::DeleteSubtask {
                task_id,
                subtask_id,
            } => self.delete_subtask(task_id, subtask_id)?.into(),
            Command::ReorderTask { moved, target } => self.reorder_task(moved, target)?.into(),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandOutcome};
    use crate::repo::kv_repo::MemoryKvStore;
    use crate::service::document_store::{create_document, DocumentStore};
    use uuid::Uuid;

    #[test]
    fn only_destructive_commands_require_confirmation() {
        assert!(Command::DeleteTask {
            task_id: Uuid::new_v4()
        }
        .requires_confirmation());
        assert!(Command::RemoveTab {
            tab_id: Uuid::new_v4()
        }
        .requires_confirmation());
        assert!(!Command::AddTab.requires_confirmation());
        assert!(!Command::DeleteSubtask {
            task_id: Uuid::new_v4(),
            subtask_id: Uuid::new_v4(),
        }
        .requires_confirmation());
    }

    #[test]
    fn apply_maps_results_to_outcomes() {
        let mut store = DocumentStore::with_document(MemoryKvStore::new(), create_document());

        let created = store
            .apply(Command::AddTask {
                text: "call plumber".to_string(),
            })
            .unwrap();
        let CommandOutcome::Created(task_id) = created else {
            panic!("expected created outcome, got {created:?}");
        };

        let done = store
            .apply(Command::SetTaskDone {
                task_id,
                done: true,
            })
            .unwrap();
        assert_eq!(done, CommandOutcome::Applied);

        let missing = store
            .apply(Command::DeleteTask {
                task_id: Uuid::new_v4(),
            })
            .unwrap();
        assert_eq!(missing, CommandOutcome::Ignored);

        let blank = store
            .apply(Command::AddTask {
                text: " ".to_string(),
            })
            .unwrap();
        assert_eq!(blank, CommandOutcome::Ignored);
    }
}
