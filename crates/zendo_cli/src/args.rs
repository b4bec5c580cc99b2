//! Command-line grammar and translation into store commands.
//!
//! # Responsibility
//! - Declare the `zendo` subcommand tree.
//! - Resolve user references (1-based index or ID prefix) to stable IDs.
//!
//! # Invariants
//! - Translation never mutates the document; it only reads it to resolve
//!   references.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;
use zendo_core::{Command, Document, Tab, Task};

#[derive(Debug, Parser)]
#[command(name = "zendo", version, about = "Tabbed task lists stored on this device")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<TopCommand>,
}

#[derive(Debug, Subcommand)]
pub enum TopCommand {
    /// Print all tabs and the active tab's tasks.
    Show,
    /// Write the whole document as pretty-printed JSON.
    Export {
        /// Target file; defaults to the data directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the whole document with a previously exported file.
    Import { path: PathBuf },
    /// Manage tabs.
    #[command(subcommand)]
    Tab(TabCommand),
    /// Manage tasks of the active tab.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage subtasks of a task in the active tab.
    #[command(subcommand)]
    Sub(SubCommand),
}

#[derive(Debug, Subcommand)]
pub enum TabCommand {
    /// Append a tab and switch to it.
    Add,
    /// Switch the active tab.
    Use { tab: String },
    Rename {
        tab: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Delete a tab with all its tasks.
    Rm {
        tab: String,
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task at the top of the active tab.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Replace a task's text.
    Text {
        task: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Done { task: String },
    Undone { task: String },
    /// Set a task's color tag, e.g. `#fde68a`.
    Color { task: String, color: String },
    /// Delete a task with its subtasks.
    Rm {
        task: String,
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Move a task to the position of another task.
    Move { task: String, target: String },
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Append a subtask.
    Add {
        task: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Text {
        task: String,
        sub: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Done { task: String, sub: String },
    Undone { task: String, sub: String },
    Rm { task: String, sub: String },
}

/// Parsed mutation plus whether the user already confirmed it.
#[derive(Debug)]
pub struct Intent {
    pub command: Command,
    pub confirmed: bool,
}

impl Intent {
    fn plain(command: Command) -> Self {
        Self {
            command,
            confirmed: false,
        }
    }
}

pub fn tab_intent(doc: &Document, command: TabCommand) -> Result<Intent, String> {
    let intent = match command {
        TabCommand::Add => Intent::plain(Command::AddTab),
        TabCommand::Use { tab } => Intent::plain(Command::SetActiveTab {
            tab_id: resolve_tab(doc, &tab)?.id,
        }),
        TabCommand::Rename { tab, name } => Intent::plain(Command::RenameTab {
            tab_id: resolve_tab(doc, &tab)?.id,
            name: name.join(" "),
        }),
        TabCommand::Rm { tab, yes } => Intent {
            command: Command::RemoveTab {
                tab_id: resolve_tab(doc, &tab)?.id,
            },
            confirmed: yes,
        },
    };
    Ok(intent)
}

pub fn task_intent(doc: &Document, command: TaskCommand) -> Result<Intent, String> {
    let tab = active_tab(doc)?;
    let intent = match command {
        TaskCommand::Add { text } => Intent::plain(Command::AddTask {
            text: text.join(" "),
        }),
        TaskCommand::Text { task, text } => Intent::plain(Command::UpdateTaskText {
            task_id: resolve_task(tab, &task)?.id,
            text: text.join(" "),
        }),
        TaskCommand::Done { task } => Intent::plain(Command::SetTaskDone {
            task_id: resolve_task(tab, &task)?.id,
            done: true,
        }),
        TaskCommand::Undone { task } => Intent::plain(Command::SetTaskDone {
            task_id: resolve_task(tab, &task)?.id,
            done: false,
        }),
        TaskCommand::Color { task, color } => Intent::plain(Command::SetTaskColor {
            task_id: resolve_task(tab, &task)?.id,
            color,
        }),
        TaskCommand::Rm { task, yes } => Intent {
            command: Command::DeleteTask {
                task_id: resolve_task(tab, &task)?.id,
            },
            confirmed: yes,
        },
        TaskCommand::Move { task, target } => Intent::plain(Command::ReorderTask {
            moved: resolve_task(tab, &task)?.id,
            target: resolve_task(tab, &target)?.id,
        }),
    };
    Ok(intent)
}

pub fn sub_intent(doc: &Document, command: SubCommand) -> Result<Intent, String> {
    let tab = active_tab(doc)?;
    let command = match command {
        SubCommand::Add { task, text } => Command::AddSubtask {
            task_id: resolve_task(tab, &task)?.id,
            text: text.join(" "),
        },
        SubCommand::Text { task, sub, text } => {
            let (task_id, subtask_id) = resolve_subtask(tab, &task, &sub)?;
            Command::UpdateSubtaskText {
                task_id,
                subtask_id,
                text: text.join(" "),
            }
        }
        SubCommand::Done { task, sub } => {
            let (task_id, subtask_id) = resolve_subtask(tab, &task, &sub)?;
            Command::SetSubtaskDone {
                task_id,
                subtask_id,
                done: true,
            }
        }
        SubCommand::Undone { task, sub } => {
            let (task_id, subtask_id) = resolve_subtask(tab, &task, &sub)?;
            Command::SetSubtaskDone {
                task_id,
                subtask_id,
                done: false,
            }
        }
        SubCommand::Rm { task, sub } => {
            let (task_id, subtask_id) = resolve_subtask(tab, &task, &sub)?;
            Command::DeleteSubtask {
                task_id,
                subtask_id,
            }
        }
    };
    Ok(Intent::plain(command))
}

fn active_tab(doc: &Document) -> Result<&Tab, String> {
    doc.active_tab()
        .ok_or_else(|| "active tab is missing; import a valid file".to_string())
}

fn resolve_tab<'doc>(doc: &'doc Document, reference: &str) -> Result<&'doc Tab, String> {
    resolve(&doc.tabs, reference, |tab| tab.id)
        .ok_or_else(|| format!("no tab matches `{reference}`"))
}

fn resolve_task<'tab>(tab: &'tab Tab, reference: &str) -> Result<&'tab Task, String> {
    resolve(&tab.tasks, reference, |task| task.id)
        .ok_or_else(|| format!("no task in `{}` matches `{reference}`", tab.name))
}

fn resolve_subtask(tab: &Tab, task: &str, sub: &str) -> Result<(Uuid, Uuid), String> {
    let task = resolve_task(tab, task)?;
    let subtask = resolve(&task.subtasks, sub, |subtask| subtask.id)
        .ok_or_else(|| format!("no subtask matches `{sub}`"))?;
    Ok((task.id, subtask.id))
}

/// Resolves a 1-based position or an unambiguous ID prefix.
fn resolve<'a, T>(items: &'a [T], reference: &str, id_of: impl Fn(&T) -> Uuid) -> Option<&'a T> {
    let reference = reference.trim();
    if let Ok(position) = reference.parse::<usize>() {
        return position.checked_sub(1).and_then(|index| items.get(index));
    }

    let needle = reference.to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut matches = items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&needle));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, task_intent, TaskCommand};
    use clap::Parser;
    use zendo_core::{create_document, new_task, Command};

    #[test]
    fn resolve_accepts_index_and_prefix() {
        let tasks = vec![new_task("a"), new_task("b")];
        let by_index = resolve(&tasks, "2", |task| task.id).unwrap();
        assert_eq!(by_index.text, "b");

        let prefix = tasks[0].id.to_string()[..8].to_string();
        let by_prefix = resolve(&tasks, &prefix, |task| task.id).unwrap();
        assert_eq!(by_prefix.text, "a");

        assert!(resolve(&tasks, "0", |task| task.id).is_none());
        assert!(resolve(&tasks, "3", |task| task.id).is_none());
    }

    #[test]
    fn task_rm_carries_confirmation_flag() {
        let mut doc = create_document();
        let task = new_task("old");
        let task_id = task.id;
        doc.tabs[0].tasks.push(task);

        let intent = task_intent(
            &doc,
            TaskCommand::Rm {
                task: "1".to_string(),
                yes: false,
            },
        )
        .unwrap();
        assert_eq!(intent.command, Command::DeleteTask { task_id });
        assert!(!intent.confirmed);
    }

    #[test]
    fn cli_parses_multi_word_text() {
        let cli = super::Cli::try_parse_from(["zendo", "task", "add", "buy", "oat", "milk"]).unwrap();
        let Some(super::TopCommand::Task(TaskCommand::Add { text })) = cli.command else {
            panic!("expected task add");
        };
        assert_eq!(text.join(" "), "buy oat milk");
    }
}
