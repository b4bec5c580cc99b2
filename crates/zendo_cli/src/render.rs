//! Full-document text rendering.

use std::fmt::Write;
use zendo_core::{Document, Task};

const ID_PREFIX_LEN: usize = 8;

/// Renders the tab bar and the active tab's tasks.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    for (index, tab) in doc.tabs.iter().enumerate() {
        let marker = if tab.id == doc.active_tab_id { '*' } else { ' ' };
        let _ = writeln!(out, "{marker}[{}] {} ({})", index + 1, tab.name, short_id(tab.id));
    }
    out.push('\n');

    let Some(tab) = doc.active_tab() else {
        out.push_str("(active tab is missing)\n");
        return out;
    };
    if tab.tasks.is_empty() {
        out.push_str("  no tasks\n");
        return out;
    }
    for (index, task) in tab.tasks.iter().enumerate() {
        render_task(&mut out, index + 1, task);
    }
    out
}

fn render_task(out: &mut String, position: usize, task: &Task) {
    let _ = write!(
        out,
        "{position:>3}. [{}] {}  {} ({})",
        check(task.done),
        task.text,
        task.color,
        short_id(task.id)
    );
    if !task.subtasks.is_empty() {
        let _ = write!(out, "  {}/{}", task.completed_subtasks(), task.subtasks.len());
    }
    out.push('\n');

    for (index, subtask) in task.subtasks.iter().enumerate() {
        let _ = writeln!(
            out,
            "       {}. [{}] {} ({})",
            index + 1,
            check(subtask.done),
            subtask.text,
            short_id(subtask.id)
        );
    }
}

fn check(done: bool) -> char {
    if done {
        'x'
    } else {
        ' '
    }
}

fn short_id(id: uuid::Uuid) -> String {
    id.to_string().chars().take(ID_PREFIX_LEN).collect()
}
