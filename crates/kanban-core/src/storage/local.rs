//! Persisted backend
//!
//! Keyed blob storage in a directory: the whole board lives under one key
//! as `<dir>/<key>.json`, a JSON array of `[columnId, tasks]` pairs. Every
//! mutation rewrites the full snapshot through a temp file and a rename.

use super::{ColumnLists, Snapshot, Storage};
use crate::{ColumnDef, Result, Task};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Key the snapshot is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "kanban-data";

/// Snapshot-file backed column lists
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
    key: String,
    lists: ColumnLists,
}

impl LocalStorage {
    /// Storage under `dir` with the default key
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_key(dir, DEFAULT_KEY)
    }

    pub fn with_key(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
            lists: ColumnLists::default(),
        }
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    /// Read the stored snapshot.
    ///
    /// A missing key and a value of the wrong shape both read as `None`.
    fn load(&self) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "stored board is malformed, starting from empty columns"
                );
                Ok(None)
            }
        }
    }

    /// Write the full snapshot of `lists`
    fn save(&self, lists: &ColumnLists) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.snapshot_path();
        let tmp = path.with_extension("json.tmp");

        {
            let file = fs::File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, lists.as_snapshot())?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;

        tracing::debug!(path = %path.display(), "board snapshot written");
        Ok(())
    }

    /// Apply `change` to a copy of the lists and keep it only once it is on disk
    fn commit(&mut self, change: impl FnOnce(&mut ColumnLists) -> bool) -> Result<()> {
        let mut next = self.lists.clone();
        if change(&mut next) {
            self.save(&next)?;
            self.lists = next;
        }
        Ok(())
    }
}

/// Remove a stored snapshot, if any
pub fn clear_snapshot(dir: &Path, key: &str) -> Result<()> {
    match fs::remove_file(dir.join(format!("{key}.json"))) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

impl Storage for LocalStorage {
    fn init(&mut self, columns: &[ColumnDef]) -> Result<()> {
        match self.load()? {
            Some(snapshot) => {
                let (lists, changed) = ColumnLists::reconcile(columns, snapshot);
                if changed {
                    self.save(&lists)?;
                }
                self.lists = lists;
            }
            None => {
                let lists = ColumnLists::empty(columns);
                self.save(&lists)?;
                self.lists = lists;
            }
        }
        Ok(())
    }

    fn add_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        self.commit(|lists| lists.add(column_id, task))
    }

    fn remove_task(&mut self, column_id: &str, task: &Task) -> Result<()> {
        self.commit(|lists| lists.remove(column_id, &task.id).is_some())
    }

    fn move_task(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        task: &Task,
        target_index: Option<usize>,
    ) -> Result<()> {
        self.commit(|lists| {
            lists.relocate(source_column_id, target_column_id, task, target_index)
        })
    }

    fn update_task_description(
        &mut self,
        column_id: &str,
        task_id: &str,
        description: &str,
    ) -> Result<()> {
        self.commit(|lists| lists.set_description(column_id, task_id, description))
    }

    fn get_tasks(&self, column_id: &str) -> &[Task] {
        self.lists.get(column_id)
    }
}
