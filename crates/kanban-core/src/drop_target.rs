//! Drop targets
//!
//! A drag ends on a drop zone. Each column shows one zone above its first
//! task and one after every task, so zone `k` means "insert at position
//! `k`" of the column as it looks before the move. The store wants the
//! position in the list after the task has left its source, which differs
//! only for a move down within one column; [`DropTarget::move_index`] does
//! that translation. Geometry stays with the caller.

use crate::{Board, Error, Result};
use serde::{Deserialize, Serialize};

/// Where a dragged task should land, as a pre-move insertion position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropTarget {
    pub column_id: String,
    pub index: usize,
}

impl DropTarget {
    pub fn new(column_id: impl Into<String>, index: usize) -> Self {
        Self {
            column_id: column_id.into(),
            index,
        }
    }

    /// Target for the `zone`-th drop zone of a column, clamped to the column
    pub fn from_zone(board: &Board, column_id: &str, zone: usize) -> Result<Self> {
        let column = board
            .find_column(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;
        Ok(Self::new(column_id, resolve_drop_index(column.tasks.len(), zone)))
    }

    /// Check the column exists. Indices are never rejected, only clamped.
    pub fn validate(&self, board: &Board) -> Result<()> {
        if board.find_column(&self.column_id).is_none() {
            return Err(Error::ColumnNotFound(self.column_id.clone()));
        }
        Ok(())
    }

    /// Dropping a task onto its own slot changes nothing.
    ///
    /// The zones directly above and below a task both mean "stay put".
    pub fn is_noop(&self, board: &Board, task_id: &str) -> bool {
        let Some(loc) = board.locate_task(task_id) else {
            return false;
        };
        let same_column = board
            .columns()
            .get(loc.column)
            .is_some_and(|c| c.id == self.column_id);
        same_column && (self.index == loc.index || self.index == loc.index + 1)
    }

    /// Index to hand to the store's move for `task_id`
    pub fn move_index(&self, board: &Board, task_id: &str) -> usize {
        let len = board.tasks(&self.column_id).len();
        let index = self.index.min(len);
        match board.locate_task(task_id) {
            Some(loc)
                if index > loc.index
                    && board
                        .columns()
                        .get(loc.column)
                        .is_some_and(|c| c.id == self.column_id) =>
            {
                index - 1
            }
            _ => index,
        }
    }
}

/// Insertion position for a drop zone in a column of `len` tasks
pub fn resolve_drop_index(len: usize, zone: usize) -> usize {
    zone.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnDef, Task};

    fn board() -> Board {
        let todo = vec![Task::new("1", "a"), Task::new("2", "b"), Task::new("3", "c")];
        Board::from_defs(
            &[ColumnDef::new("todo", "To Do"), ColumnDef::new("done", "Done")],
            |id| match id {
                "todo" => todo.as_slice(),
                _ => &[],
            },
        )
    }

    #[test]
    fn test_resolve_drop_index_clamps() {
        assert_eq!(resolve_drop_index(3, 0), 0);
        assert_eq!(resolve_drop_index(3, 3), 3);
        assert_eq!(resolve_drop_index(3, 7), 3);
        assert_eq!(resolve_drop_index(0, 2), 0);
    }

    #[test]
    fn test_from_zone() {
        let board = board();
        assert_eq!(
            DropTarget::from_zone(&board, "done", 4).unwrap(),
            DropTarget::new("done", 0)
        );
        assert_eq!(
            DropTarget::from_zone(&board, "todo", 2).unwrap(),
            DropTarget::new("todo", 2)
        );
        assert!(matches!(
            DropTarget::from_zone(&board, "nope", 0),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_validate() {
        let board = board();
        assert!(DropTarget::new("todo", 99).validate(&board).is_ok());
        assert!(matches!(
            DropTarget::new("nope", 0).validate(&board),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_is_noop() {
        let board = board();
        assert!(DropTarget::new("todo", 1).is_noop(&board, "2"));
        assert!(DropTarget::new("todo", 2).is_noop(&board, "2"));
        assert!(!DropTarget::new("todo", 0).is_noop(&board, "2"));
        assert!(!DropTarget::new("done", 1).is_noop(&board, "2"));
        assert!(!DropTarget::new("todo", 1).is_noop(&board, "missing"));
    }

    #[test]
    fn test_move_index_accounts_for_own_slot() {
        let board = board();
        // Below its own slot in the same column: one slot fewer once removed.
        assert_eq!(DropTarget::new("todo", 3).move_index(&board, "1"), 2);
        assert_eq!(DropTarget::new("todo", 0).move_index(&board, "3"), 0);
        assert_eq!(DropTarget::new("todo", 9).move_index(&board, "2"), 2);
        // Other columns use the position as is.
        assert_eq!(DropTarget::new("done", 0).move_index(&board, "1"), 0);
        assert_eq!(DropTarget::new("done", 5).move_index(&board, "1"), 0);
    }
}
