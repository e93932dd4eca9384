//! Backend chosen at runtime from configuration
//!
//! Wraps both backends behind one type so the store and the CLI do not need
//! to be generic over the configured choice.

use super::{LocalStorage, MemoryStorage, Storage};
use crate::{ColumnDef, Error, Result, Task};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Memory,
    #[default]
    Local,
}

impl std::str::FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(StorageKind::Memory),
            "local" | "file" => Ok(StorageKind::Local),
            _ => Err(Error::Config(format!("unknown storage backend: {s}"))),
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Memory => write!(f, "memory"),
            StorageKind::Local => write!(f, "local"),
        }
    }
}

/// Either backend
#[derive(Debug, Clone)]
pub enum UnifiedStorage {
    Memory(MemoryStorage),
    Local(LocalStorage),
}

impl UnifiedStorage {
    /// Open the configured backend. `dir` and `key` only matter for local storage.
    pub fn open(kind: StorageKind, dir: impl Into<PathBuf>, key: &str) -> Self {
        match kind {
            StorageKind::Memory => UnifiedStorage::Memory(MemoryStorage::new()),
            StorageKind::Local => UnifiedStorage::Local(LocalStorage::with_key(dir, key)),
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            UnifiedStorage::Memory(_) => StorageKind::Memory,
            UnifiedStorage::Local(_) => StorageKind::Local,
        }
    }
}

impl Storage for UnifiedStorage {
    fn init(&mut self, columns: &[ColumnDef]) -> Result<()> {
        match self {
            UnifiedStorage::Memory(s) => s.init(columns),
            UnifiedStorage::Local(s) => s.init(columns),
        }
    }

    fn add_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        match self {
            UnifiedStorage::Memory(s) => s.add_task(column_id, task),
            UnifiedStorage::Local(s) => s.add_task(column_id, task),
        }
    }

    fn remove_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        match self {
            UnifiedStorage::Memory(s) => s.remove_task(column_id, task),
            UnifiedStorage::Local(s) => s.remove_task(column_id, task),
        }
    }

    fn move_task(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> Result<()> {
        match self {
            UnifiedStorage::Memory(s) => {
                s.move_task(source_column_id, target_column_id, task, target_index)
            }
            UnifiedStorage::Local(s) => {
                s.move_task(source_column_id, target_column_id, task, target_index)
            }
        }
    }

    fn update_task_description(
        &mut self,
        column_id: &str,
        task_id: &str,
        description: &str,
    ) -> Result<()> {
        match self {
            UnifiedStorage::Memory(s) => s.update_task_description(column_id, task_id, description),
            UnifiedStorage::Local(s) => s.update_task_description(column_id, task_id, description),
        }
    }

    fn get_tasks(&self, column_id: &str) -> &[Task] {
        match self {
            UnifiedStorage::Memory(s) => s.get_tasks(column_id),
            UnifiedStorage::Local(s) => s.get_tasks(column_id),
        }
    }
}
