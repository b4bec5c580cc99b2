//! Task document model.
//!
//! # Responsibility
//! - Define the tab/task/subtask tree persisted and exported as one document.
//! - Provide read helpers for locating entities by stable ID.
//!
//! # Invariants
//! - `Document::tabs` holds between 1 and `MAX_TABS` elements.
//! - `Document::active_tab_id` resolves to one element of `tabs`.
//! - Every entity is owned by exactly one parent; there is no sharing.
//! - Subtask completion never rolls up into, or derives from, `Task::done`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a tab.
pub type TabId = Uuid;
/// Stable identifier of a task.
pub type TaskId = Uuid;
/// Stable identifier of a subtask.
pub type SubtaskId = Uuid;

/// Upper bound for `Document::tabs`.
pub const MAX_TABS: usize = 5;

/// Color assigned to new tasks (pastel mint).
pub const DEFAULT_TASK_COLOR: &str = "#a7f3d0";

/// Complete persisted/exported state: all tabs plus the active-tab pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Display order of tabs.
    pub tabs: Vec<Tab>,
    /// Tab currently displayed and operated on.
    pub active_tab_id: TabId,
}

/// Named, ordered bucket of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    /// Display order, newest first unless reordered.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// To-do item with completion state, color tag and checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// `#rrggbb` string. Not validated; the view layer constrains input.
    #[serde(default = "default_task_color")]
    pub color: String,
    /// Checklist order, oldest first.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Independently completable checklist item of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

fn default_task_color() -> String {
    DEFAULT_TASK_COLOR.to_string()
}

impl Document {
    /// Returns the tab referenced by `active_tab_id`.
    ///
    /// `None` only when the document is inconsistent (e.g. a foreign import);
    /// callers must then treat the document as unusable.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(self.active_tab_id)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let active = self.active_tab_id;
        self.tab_mut(active)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    /// Returns whether tab bounds and the active pointer hold.
    pub fn is_consistent(&self) -> bool {
        (1..=MAX_TABS).contains(&self.tabs.len()) && self.active_tab().is_some()
    }
}

impl Tab {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn task_position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

impl Task {
    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|subtask| subtask.id == id)
    }

    pub fn subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|subtask| subtask.id == id)
    }

    /// Number of completed subtasks, for display only.
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|subtask| subtask.done).count()
    }
}
