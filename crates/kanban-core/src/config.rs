//! Configuration for kanban
//!
//! Stored in .kanban/config.toml

use crate::ColumnDef;
use crate::id::DEFAULT_PREFIX;
use crate::storage::{DEFAULT_KEY, StorageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// kanban configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for generated task ids
    pub id_prefix: String,

    /// Board columns, in display order. Fixed for the life of a board.
    pub columns: Vec<ColumnDef>,

    /// Storage settings
    pub storage: StorageConfig,

    /// Display settings
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_PREFIX.to_string(),
            columns: default_columns(),
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// The three columns a new board starts with
pub fn default_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("todo", "To Do"),
        ColumnDef::new("in-progress", "In Progress"),
        ColumnDef::new("done", "Done"),
    ]
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend: "local" persists to disk, "memory" keeps nothing
    pub backend: StorageKind,

    /// Key the board snapshot is stored under
    pub key: String,

    /// Directory for the snapshot (defaults to the .kanban directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::default(),
            key: DEFAULT_KEY.to_string(),
            dir: None,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Show task count in column headers
    pub show_count: bool,

    /// Maximum description length before truncation
    pub max_description_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            show_count: true,
            max_description_length: 80,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations no board could be built from
    pub fn validate(&self) -> crate::Result<()> {
        if self.columns.is_empty() {
            return Err(crate::Error::Config("at least one column is required".into()));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.id.trim().is_empty() {
                return Err(crate::Error::Config("column id must not be empty".into()));
            }
            if !seen.insert(column.id.as_str()) {
                return Err(crate::Error::DuplicateColumn(column.id.clone()));
            }
        }
        if self.storage.key.trim().is_empty() {
            return Err(crate::Error::Config("storage key must not be empty".into()));
        }
        Ok(())
    }

    /// Directory the snapshot lives in, relative paths resolved against `base`
    pub fn storage_dir(&self, base: &Path) -> PathBuf {
        match &self.storage.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        }
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# kanban configuration

# Prefix for generated task ids
id_prefix = "task"

# Board columns, in display order.
# The column set is fixed once the board holds tasks: ids are stored
# alongside the tasks, and tasks in a removed column are dropped on load.
[[columns]]
id = "todo"
title = "To Do"

[[columns]]
id = "in-progress"
title = "In Progress"

[[columns]]
id = "done"
title = "Done"

[storage]
# "local" keeps the board in a snapshot file, "memory" keeps nothing
backend = "local"

# Key the snapshot is stored under (file name without .json)
key = "kanban-data"

# Directory for the snapshot, relative to .kanban/ (defaults to .kanban/)
# dir = "data"

[display]
# Use colors in output
colors = true

# Show task count in column headers
show_count = true

# Maximum description length before truncation
max_description_length = 80
"#
        .to_string()
    }
}
