//! In-memory backend. Nothing survives the process.

use super::{ColumnLists, Storage};
use crate::{ColumnDef, Result, Task};

/// Volatile column lists
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    lists: ColumnLists,
    initialized: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn init(&mut self, columns: &[ColumnDef]) -> Result<()> {
        // A second init keeps what is already held, like a persisted snapshot would.
        self.lists = if self.initialized {
            ColumnLists::reconcile(columns, self.lists.as_snapshot().clone()).0
        } else {
            ColumnLists::empty(columns)
        };
        self.initialized = true;
        Ok(())
    }

    fn add_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        self.lists.add(column_id, task);
        Ok(())
    }

    fn remove_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        self.lists.remove(column_id, &task.id);
        Ok(())
    }

    fn move_task(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> Result<()> {
        self.lists
            .relocate(source_column_id, target_column_id, task, target_index);
        Ok(())
    }

    fn update_task_description(
        &mut self,
        column_id: &str,
        task_id: &str,
        description: &str,
    ) -> Result<()> {
        self.lists.set_description(column_id, task_id, description);
        Ok(())
    }

    fn get_tasks(&self, column_id: &str) -> &[Task] {
        self.lists.get(column_id)
    }
}
