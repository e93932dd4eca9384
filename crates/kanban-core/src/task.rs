//! Board data model
//!
//! A board is a fixed, ordered set of columns. Each column owns an ordered
//! list of tasks; the list order is the order the user sees.

use serde::{Deserialize, Serialize};

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique across the whole board, not just within a column
    pub id: String,

    /// Free text, editable
    pub description: String,
}

impl Task {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.description)
    }
}

/// Static column descriptor supplied at board initialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub title: String,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A column and its tasks, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column from its descriptor
    pub fn from_def(def: &ColumnDef) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            tasks: Vec::new(),
        }
    }

    /// Position of a task in this column
    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// Where a task currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation {
    pub column: usize,
    pub index: usize,
}

/// The full ordered collection of columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Build a board from column definitions and the tasks for each column.
    ///
    /// `tasks_for` is asked once per column, in definition order.
    pub fn from_defs<'a>(
        defs: &[ColumnDef],
        mut tasks_for: impl FnMut(&str) -> &'a [Task],
    ) -> Self {
        let columns = defs
            .iter()
            .map(|def| Column {
                tasks: tasks_for(&def.id).to_vec(),
                ..Column::from_def(def)
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub(crate) fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub(crate) fn column_at_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    /// Tasks of a column, empty for an unknown column
    pub fn tasks(&self, column_id: &str) -> &[Task] {
        self.find_column(column_id)
            .map(|c| c.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Find the column and index holding a task id
    pub fn locate_task(&self, task_id: &str) -> Option<TaskLocation> {
        self.columns.iter().enumerate().find_map(|(column, c)| {
            c.position(task_id)
                .map(|index| TaskLocation { column, index })
        })
    }

    /// Find a task and the id of the column holding it
    pub fn find_task(&self, task_id: &str) -> Option<(&Column, &Task)> {
        let loc = self.locate_task(task_id)?;
        let column = self.columns.get(loc.column)?;
        column.tasks.get(loc.index).map(|task| (column, task))
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.locate_task(task_id).is_some()
    }

    /// Total number of tasks across all columns
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Ordered `(column id, tasks)` pairs
    pub fn snapshot(&self) -> Vec<(&str, &[Task])> {
        self.columns
            .iter()
            .map(|c| (c.id.as_str(), c.tasks.as_slice()))
            .collect()
    }
}
