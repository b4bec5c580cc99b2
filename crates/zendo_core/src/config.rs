//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve data/log directories and log level from the environment.
//! - Derive storage and export paths from the data directory.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never touches the file system.

use crate::logging::default_log_level;
use crate::service::transfer::EXPORT_FILE_NAME;
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "ZENDO_DATA_DIR";
pub const ENV_LOG_DIR: &str = "ZENDO_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "ZENDO_LOG_LEVEL";

const DB_FILE_NAME: &str = "zendo.sqlite3";
const DEFAULT_DATA_DIR_NAME: &str = "zendo";
const LOG_DIR_NAME: &str = "logs";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the SQLite key-value database.
    pub data_dir: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = read(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME));
        let log_dir = read(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME));
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        Self {
            data_dir,
            log_dir,
            log_level,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn default_export_path(&self) -> PathBuf {
        self.data_dir.join(EXPORT_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_DATA_DIR, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert!(config.data_dir.ends_with("zendo"));
        assert_eq!(config.log_dir, config.data_dir.join("logs"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "   ")]));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn explicit_values_win_and_derive_paths() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/var/lib/zendo"),
            (ENV_LOG_DIR, "/var/log/zendo"),
            (ENV_LOG_LEVEL, "warn"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/zendo"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/zendo"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/zendo/zendo.sqlite3"));
        assert_eq!(
            config.default_export_path(),
            PathBuf::from("/var/lib/zendo/zendo-export.json")
        );
    }
}
