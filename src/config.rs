//! Loader configuration
//!
//! The original loader hard-coded the datasets directory, the database path
//! and the log sink. Those values now live in an explicit configuration
//! structure constructed by the entry point, optionally loaded from a JSON
//! file. The defaults reproduce the historical layout.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Append-only log file path.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Minimum level written to the sink ("debug", "info", ...).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

/// Full loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory scanned (non-recursively) for source files.
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: PathBuf,

    /// File-backed SQLite database receiving the tables.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Log sink settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            datasets_dir: default_datasets_dir(),
            database_path: default_database_path(),
            log: LogConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a JSON file. Missing fields fall back to the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

fn default_datasets_dir() -> PathBuf {
    PathBuf::from("datasets")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("inventory.db")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/ingestion_db.log")
}

fn default_log_level() -> String {
    "debug".to_string()
}
