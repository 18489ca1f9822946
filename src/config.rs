//! Database configuration
//!
//! Where the standard tables live on disk and whether their rows are loaded
//! when the database is opened. Configs are JSON files; every field is
//! optional and falls back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TINYDB_DATA_DIR";

/// File names of the standard tables, relative to the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub employees: String,
    pub departments: String,
    pub projects: String,
    pub employees_projects: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            employees: "employee_table.csv".to_string(),
            departments: "department_table.csv".to_string(),
            projects: "project_table.csv".to_string(),
            employees_projects: "employee_project_table.csv".to_string(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding the table files
    pub data_dir: PathBuf,
    /// Load persisted rows when tables are opened
    pub load_existing: bool,
    /// Per-table file names
    pub files: TableFiles,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            load_existing: true,
            files: TableFiles::default(),
        }
    }
}

impl DatabaseConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set whether persisted rows are loaded on open
    pub fn load_existing(mut self, load: bool) -> Self {
        self.load_existing = load;
        self
    }

    /// Read a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read '{}': {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply `TINYDB_DATA_DIR` if it is set and non-empty
    pub fn with_env(self) -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => self.data_dir(dir),
            _ => self,
        }
    }

    /// Defaults overlaid with the environment
    pub fn from_env() -> Self {
        Self::default().with_env()
    }
}
