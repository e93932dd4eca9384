//! Storage backends for the board
//!
//! A backend holds the per-column task lists and, for the persisted
//! variant, writes the whole snapshot on every mutation. Backends do not
//! validate column ids: an unknown column is a silent no-op, the store
//! checks ids before calling in.

mod local;
mod memory;
mod unified;

pub use local::{DEFAULT_KEY, LocalStorage, clear_snapshot};
pub use memory::MemoryStorage;
pub use unified::{StorageKind, UnifiedStorage};

use crate::{ColumnDef, Result, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persistence contract shared by every backend
pub trait Storage {
    /// Establish per-column lists. A previously persisted snapshot wins over
    /// the empty defaults; without one the empty state is persisted.
    fn init(&mut self, columns: &[ColumnDef]) -> Result<()>;

    /// Append a task to the end of a column
    fn add_task(&mut self, column_id: &str, task: &Task) -> Result<()>;

    /// Remove the first task in the column with the same id
    fn remove_task(&mut self, column_id: &str, task: &Task) -> Result<()>;

    /// Remove from `source`, insert into `target` at `target_index`
    /// (clamped; `None` appends). Persisted as one write.
    fn move_task(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> Result<()>;

    /// Replace the description of a task in a column
    fn update_task_description(
        &mut self,
        column_id: &str,
        task_id: &str,
        description: &str,
    ) -> Result<()>;

    /// Tasks of a column; empty for an unknown column
    fn get_tasks(&self, column_id: &str) -> &[Task];
}

/// Serialized form of the board: ordered `[columnId, tasks]` pairs
pub type Snapshot = Vec<(String, Vec<Task>)>;

/// Ordered column lists shared by the backends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct ColumnLists {
    columns: Snapshot,
}

impl ColumnLists {
    /// Empty lists for each column definition
    pub(crate) fn empty(defs: &[ColumnDef]) -> Self {
        Self {
            columns: defs.iter().map(|d| (d.id.clone(), Vec::new())).collect(),
        }
    }

    /// Fit a loaded snapshot to the column definitions.
    ///
    /// Columns follow definition order. Unknown columns are dropped, missing
    /// ones start empty, and a task id seen twice keeps its first
    /// occurrence. Returns the lists and whether anything was changed.
    pub(crate) fn reconcile(defs: &[ColumnDef], snapshot: Snapshot) -> (Self, bool) {
        let known: HashSet<&str> = defs.iter().map(|d| d.id.as_str()).collect();
        let mut changed = snapshot.len() != defs.len();

        let mut loaded: Vec<(String, Vec<Task>)> = Vec::with_capacity(snapshot.len());
        for (id, tasks) in snapshot {
            if known.contains(id.as_str()) && !loaded.iter().any(|(seen, _)| *seen == id) {
                loaded.push((id, tasks));
            } else {
                tracing::warn!(column = %id, "dropping unknown or repeated column from snapshot");
                changed = true;
            }
        }

        let mut seen_tasks = HashSet::new();
        let mut columns = Vec::with_capacity(defs.len());
        for (position, def) in defs.iter().enumerate() {
            let tasks = match loaded.iter().position(|(id, _)| *id == def.id) {
                Some(i) => {
                    if i != position {
                        changed = true;
                    }
                    std::mem::take(&mut loaded[i].1)
                }
                None => {
                    changed = true;
                    Vec::new()
                }
            };
            let before = tasks.len();
            let tasks: Vec<Task> = tasks
                .into_iter()
                .filter(|t| seen_tasks.insert(t.id.clone()))
                .collect();
            if tasks.len() != before {
                tracing::warn!(column = %def.id, "dropping duplicate task ids from snapshot");
                changed = true;
            }
            columns.push((def.id.clone(), tasks));
        }

        (Self { columns }, changed)
    }

    pub(crate) fn as_snapshot(&self) -> &Snapshot {
        &self.columns
    }

    fn list_mut(&mut self, column_id: &str) -> Option<&mut Vec<Task>> {
        self.columns
            .iter_mut()
            .find(|(id, _)| id == column_id)
            .map(|(_, tasks)| tasks)
    }

    pub(crate) fn get(&self, column_id: &str) -> &[Task] {
        self.columns
            .iter()
            .find(|(id, _)| id == column_id)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if the lists changed
    pub(crate) fn add(&mut self, column_id: &str, task: &Task) -> bool {
        match self.list_mut(column_id) {
            Some(tasks) => {
                tasks.push(task.clone());
                true
            }
            None => {
                tracing::debug!(column = %column_id, "add to unknown column ignored");
                false
            }
        }
    }

    pub(crate) fn remove(&mut self, column_id: &str, task_id: &str) -> Option<Task> {
        let tasks = self.list_mut(column_id)?;
        let index = tasks.iter().position(|t| t.id == task_id)?;
        Some(tasks.remove(index))
    }

    /// Remove then insert, both in memory. Returns true if the lists changed.
    pub(crate) fn relocate(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> bool {
        // Removing from the source while the target is unknown would lose the task.
        if self.list_mut(target_column_id).is_none() {
            tracing::debug!(column = %target_column_id, "move to unknown column ignored");
            return false;
        }
        // The stored record moves; `task` only names it.
        let moved = self
            .remove(source_column_id, &task.id)
            .unwrap_or_else(|| task.clone());
        let Some(tasks) = self.list_mut(target_column_id) else {
            return true;
        };
        let index = target_index.map_or(tasks.len(), |i| i.min(tasks.len()));
        tasks.insert(index, moved);
        true
    }

    pub(crate) fn set_description(
        &mut self,
        column_id: &str,
        task_id: &str,
        description: &str,
    ) -> bool {
        let Some(task) = self
            .list_mut(column_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
        else {
            return false;
        };
        task.description = description.to_string();
        true
    }
}
