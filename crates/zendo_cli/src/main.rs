//! Terminal view layer for ZenDo.
//!
//! # Responsibility
//! - Translate command-line input into store commands.
//! - Enforce confirmation gates and print blocking notices.
//! - Re-render the whole document after every command.

mod args;
mod render;

use args::{sub_intent, tab_intent, task_intent, Cli, Intent, TopCommand};
use clap::Parser;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;
use zendo_core::db::{open_db, DbError};
use zendo_core::{
    export_to_path, import_from_path, init_logging_from_config, AppConfig, CommandOutcome,
    DocumentStore, SqliteKvStore, StoreError,
};

#[derive(Debug)]
enum CliError {
    /// Blocking notice for the user; the document is unchanged.
    Notice(String),
    Store(StoreError),
    Db(DbError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notice(message) => write!(f, "notice: {message}"),
            Self::Store(err) if err.is_user_notice() => write!(f, "notice: {err}"),
            Self::Store(err) => write!(f, "error: {err}"),
            Self::Db(err) => write!(f, "error: database unavailable: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Notice(_) => None,
            Self::Store(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        Self::Notice(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &AppConfig) -> Result<(), CliError> {
    std::fs::create_dir_all(config.data_dir()).map_err(StoreError::from)?;
    let conn = open_db(config.db_path())?;
    let mut store = DocumentStore::load(SqliteKvStore::new(&conn))?;

    let intent = match cli.command.unwrap_or(TopCommand::Show) {
        TopCommand::Show => None,
        TopCommand::Export { out } => {
            let path = out.unwrap_or_else(|| config.default_export_path());
            export_to_path(&store, &path)?;
            println!("Exported to {}", path.display());
            return Ok(());
        }
        TopCommand::Import { path } => {
            import_from_path(&mut store, &path)?;
            println!("Import successful.");
            None
        }
        TopCommand::Tab(command) => Some(tab_intent(store.document(), command)?),
        TopCommand::Task(command) => Some(task_intent(store.document(), command)?),
        TopCommand::Sub(command) => Some(sub_intent(store.document(), command)?),
    };

    if let Some(intent) = intent {
        dispatch(&mut store, intent)?;
    }
    print!("{}", render::render(store.document()));
    Ok(())
}

fn dispatch(store: &mut DocumentStore<SqliteKvStore<'_>>, intent: Intent) -> Result<(), CliError> {
    let Intent { command, confirmed } = intent;
    if command.requires_confirmation() && !confirmed {
        return Err(CliError::Notice(format!(
            "`{}` deletes data; re-run with --yes to confirm",
            command.name()
        )));
    }

    let name = command.name();
    match store.apply(command)? {
        CommandOutcome::Applied | CommandOutcome::Created(_) => {
            info!("event=cli_command module=cli status=ok op={name}");
        }
        CommandOutcome::Ignored => {
            println!("Nothing changed.");
        }
    }
    Ok(())
}
