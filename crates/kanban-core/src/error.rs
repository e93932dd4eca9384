//! Error types for kanban

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task already exists: {0}")]
    DuplicateTask(String),

    #[error("Duplicate column id in board definition: {0}")]
    DuplicateColumn(String),

    #[error("Board not initialized")]
    NotInitialized,

    #[error("Board already initialized")]
    AlreadyInitialized,

    #[error("No board found. Run 'kanban init' first.")]
    BoardNotFound,

    #[error("Board already exists at {0}")]
    BoardExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
