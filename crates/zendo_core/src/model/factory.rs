//! Entity constructors with fresh identifiers and default fields.
//!
//! The factory performs no validation; blank-text rejection belongs to the
//! document store.

use super::document::{Subtask, Tab, Task, DEFAULT_TASK_COLOR};
use uuid::Uuid;

/// Creates an empty tab named `Tab {display_index}`.
pub fn new_tab(display_index: usize) -> Tab {
    Tab {
        id: Uuid::new_v4(),
        name: format!("Tab {display_index}"),
        tasks: Vec::new(),
    }
}

/// Creates an open task with trimmed text and the default color.
pub fn new_task(raw_text: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        text: raw_text.trim().to_string(),
        done: false,
        color: DEFAULT_TASK_COLOR.to_string(),
        subtasks: Vec::new(),
    }
}

/// Creates an open subtask with trimmed text.
pub fn new_subtask(raw_text: &str) -> Subtask {
    Subtask {
        id: Uuid::new_v4(),
        text: raw_text.trim().to_string(),
        done: false,
    }
}
