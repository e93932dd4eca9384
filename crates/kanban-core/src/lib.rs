//! kanban-core: Core library for the kanban task board
//!
//! Board state, pluggable snapshot storage, and change notification for a
//! local task board. Columns are fixed at startup; tasks are added, edited,
//! moved and deleted through a single [`BoardStore`].

pub mod config;
pub mod drop_target;
pub mod error;
pub mod home;
pub mod id;
pub mod notifier;
pub mod storage;
pub mod store;
pub mod task;

pub use config::Config;
pub use drop_target::{DropTarget, resolve_drop_index};
pub use error::Error;
pub use home::BoardHome;
pub use id::generate_id;
pub use notifier::{BoardEvent, ChangeKind, ChangeNotifier, SubscriptionId};
pub use storage::{LocalStorage, MemoryStorage, Storage, StorageKind, UnifiedStorage};
pub use store::BoardStore;
pub use task::{Board, Column, ColumnDef, Task, TaskLocation};

/// Result type for kanban operations
pub type Result<T> = std::result::Result<T, Error>;
