//! Board directory discovery
//!
//! A board lives in a `.kanban/` directory holding `config.toml` and, for
//! local storage, the snapshot file. Lookup walks up from the current
//! directory; a per-user board under the data directory is the fallback.

use crate::storage::UnifiedStorage;
use crate::{BoardStore, Config, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const KANBAN_DIR: &str = ".kanban";
const CONFIG_FILE: &str = "config.toml";

/// Location of a board on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardHome {
    dir: PathBuf,
}

impl BoardHome {
    /// Use an explicit `.kanban` directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Find the board for the current directory
    pub fn find() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::find_from(&cwd)
    }

    /// Find the nearest board at or above `start`, else the per-user board
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(KANBAN_DIR);
            if candidate.is_dir() {
                return Ok(Self::at(candidate));
            }
            if !current.pop() {
                break;
            }
        }

        match global_dir() {
            Some(dir) if dir.is_dir() => Ok(Self::at(dir)),
            _ => Err(Error::BoardNotFound),
        }
    }

    /// Create a board directory under `root` with a commented default config
    pub fn init(root: &Path) -> Result<Self> {
        Self::create(root.join(KANBAN_DIR))
    }

    /// Create the per-user board
    pub fn init_global() -> Result<Self> {
        let dir = global_dir()
            .ok_or_else(|| Error::Other("Could not determine data directory".into()))?;
        Self::create(dir)
    }

    /// Create a board in `dir` itself
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.join(CONFIG_FILE).exists() {
            return Err(Error::BoardExists(dir.display().to_string()));
        }
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(CONFIG_FILE), Config::default_with_comments())?;
        tracing::debug!(dir = %dir.display(), "board directory created");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_path())
    }

    /// Open the configured backend and hydrate a store from it
    pub fn open_store(&self, config: &Config) -> Result<BoardStore<UnifiedStorage>> {
        let storage = UnifiedStorage::open(
            config.storage.backend,
            config.storage_dir(&self.dir),
            &config.storage.key,
        );
        let mut store = BoardStore::new(storage);
        store.init(&config.columns)?;
        Ok(store)
    }
}

/// Per-user board directory (e.g. ~/.local/share/kanban)
pub fn global_dir() -> Option<PathBuf> {
    std::env::var("KANBAN_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|d| d.join("kanban")))
}
