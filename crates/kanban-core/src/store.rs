//! Board store
//!
//! Owns the backend, a cached copy of the board for synchronous reads, and
//! the change notifier. Every mutation follows the same order: validate
//! against the cache, write through the backend once, commit to the cache,
//! then emit exactly one event. A backend failure leaves the cache as it was
//! and emits nothing.

use crate::notifier::{BoardEvent, ChangeNotifier, SubscriberResult, SubscriptionId};
use crate::storage::Storage;
use crate::{Board, Column, ColumnDef, DropTarget, Error, Result, Task};
use std::collections::HashSet;

/// Board state and its persistence
#[derive(Debug)]
pub struct BoardStore<S: Storage> {
    storage: S,
    board: Board,
    initialized: bool,
    notifier: ChangeNotifier,
}

impl<S: Storage> BoardStore<S> {
    /// Wrap a backend. Call [`BoardStore::init`] before mutating.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            board: Board::default(),
            initialized: false,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Hydrate the board from the backend using the static column set.
    ///
    /// Runs once per store; the column set is fixed afterwards.
    pub fn init(&mut self, columns: &[ColumnDef]) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(Error::DuplicateColumn(dup.id.clone()));
        }

        self.storage.init(columns)?;
        let storage = &self.storage;
        self.board = Board::from_defs(columns, |id| storage.get_tasks(id));
        self.initialized = true;

        tracing::debug!(
            columns = columns.len(),
            tasks = self.board.task_count(),
            "board initialized"
        );
        self.emit(BoardEvent::Init {
            columns: self.board.columns().to_vec(),
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Append a task to a column
    pub fn add_task(&mut self, column_id: &str, task: Task) -> Result<()> {
        let column = self.column_index(column_id)?;
        if self.board.contains_task(&task.id) {
            return Err(Error::DuplicateTask(task.id));
        }

        self.storage.add_task(column_id, &task)?;
        let tasks = &mut self.column_mut(column).tasks;
        let index = tasks.len();
        tasks.push(task.clone());

        tracing::debug!(task = %task.id, column = %column_id, "task added");
        self.emit(BoardEvent::AddTask {
            column_id: column_id.to_string(),
            task,
            index,
        });
        Ok(())
    }

    /// Remove a task from a column by id.
    ///
    /// Returns false, without writing or notifying, when the column does not
    /// hold the task. `task` may be a stale copy; only its id is compared.
    pub fn remove_task(&mut self, column_id: &str, task: &Task) -> Result<bool> {
        let column = self.column_index(column_id)?;
        let Some(index) = self.column_ref(column).position(&task.id) else {
            return Ok(false);
        };

        self.storage.remove_task(column_id, task)?;
        let removed = self.column_mut(column).tasks.remove(index);

        tracing::debug!(task = %removed.id, column = %column_id, "task removed");
        self.emit(BoardEvent::RemoveTask {
            column_id: column_id.to_string(),
            task: removed,
            index,
        });
        Ok(true)
    }

    /// Delete a task from whichever column holds it
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let loc = self
            .board
            .locate_task(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        let column_id = self.column_ref(loc.column).id.clone();
        let task = self.column_ref(loc.column).tasks[loc.index].clone();

        self.remove_task(&column_id, &task)?;
        Ok(task)
    }

    /// Move a task out of `source_column_id` into `target_column_id`.
    ///
    /// `target_index` addresses the target list once the task has left the
    /// source and is clamped to its length; `None` appends. The backend sees
    /// one move, so the task is never observable in zero or two columns.
    /// Returns the index the task landed at.
    pub fn move_task(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> Result<usize> {
        let source = self.column_index(source_column_id)?;
        let target = self.column_index(target_column_id)?;
        let from = self
            .column_ref(source)
            .position(&task.id)
            .ok_or_else(|| Error::TaskNotFound(task.id.clone()))?;

        // The cached record stays authoritative; a caller's copy may be stale.
        let current = self.column_ref(source).tasks[from].clone();
        self.storage
            .move_task(source_column_id, target_column_id, &current, target_index)?;

        let moved = self.column_mut(source).tasks.remove(from);
        let tasks = &mut self.column_mut(target).tasks;
        let index = target_index.map_or(tasks.len(), |i| i.min(tasks.len()));
        tasks.insert(index, moved.clone());

        tracing::debug!(
            task = %moved.id,
            from = %source_column_id,
            to = %target_column_id,
            index,
            "task moved"
        );
        self.emit(BoardEvent::MoveTask {
            source_column_id: source_column_id.to_string(),
            target_column_id: target_column_id.to_string(),
            task: moved,
            target_index: index,
        });
        Ok(index)
    }

    /// Apply the result of a drag: move `task_id` to the drop target.
    ///
    /// Returns the landing index. Dropping a task onto its own slot is not a
    /// change and emits nothing.
    pub fn apply_drop(&mut self, task_id: &str, target: &DropTarget) -> Result<usize> {
        target.validate(&self.board)?;
        let (column, task) = self
            .board
            .find_task(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        let source_column_id = column.id.clone();
        let task = task.clone();

        if target.is_noop(&self.board, task_id) {
            return self
                .board
                .locate_task(task_id)
                .map(|loc| loc.index)
                .ok_or_else(|| Error::TaskNotFound(task_id.to_string()));
        }

        let index = target.move_index(&self.board, task_id);
        self.move_task(&source_column_id, &target.column_id, &task, Some(index))
    }

    /// Replace a task's description
    pub fn update_task_description(&mut self, task_id: &str, description: &str) -> Result<()> {
        self.ensure_initialized()?;
        let loc = self
            .board
            .locate_task(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        let column_id = self.column_ref(loc.column).id.clone();

        self.storage
            .update_task_description(&column_id, task_id, description)?;
        if let Some(task) = self.column_mut(loc.column).tasks.get_mut(loc.index) {
            task.description = description.to_string();
        }

        tracing::debug!(task = %task_id, column = %column_id, "description updated");
        self.emit(BoardEvent::UpdateTaskDescription {
            column_id,
            task_id: task_id.to_string(),
            description: description.to_string(),
            index: loc.index,
        });
        Ok(())
    }

    /// Tasks of a column in display order; empty for an unknown column
    pub fn get_tasks(&self, column_id: &str) -> &[Task] {
        self.board.tasks(column_id)
    }

    pub fn columns(&self) -> &[Column] {
        self.board.columns()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Find a task and the column holding it
    pub fn find_task(&self, task_id: &str) -> Option<(&Column, &Task)> {
        self.board.find_task(task_id)
    }

    /// The backend, for inspection
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a change subscriber
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&BoardEvent) -> SubscriberResult + 'static,
    {
        self.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn emit(&mut self, event: BoardEvent) {
        let delivery = self.notifier.emit(&event);
        if delivery.failed > 0 {
            tracing::debug!(
                kind = %event.kind(),
                failed = delivery.failed,
                "change delivered with subscriber failures"
            );
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn column_index(&self, column_id: &str) -> Result<usize> {
        self.ensure_initialized()?;
        self.board
            .column_index(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))
    }

    // Indices come from `column_index` on this board, whose columns are fixed after init.
    fn column_ref(&self, index: usize) -> &Column {
        &self.board.columns()[index]
    }

    fn column_mut(&mut self, index: usize) -> &mut Column {
        self.board.column_at_mut(index)
    }
}
