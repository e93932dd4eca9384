//! CLI command implementations

use anyhow::{Result, bail};
use colored::Colorize;
use kanban_core::id::generate_unique_id;
use kanban_core::storage::clear_snapshot;
use kanban_core::{
    BoardHome, BoardStore, Config, DropTarget, StorageKind, Task, UnifiedStorage,
};
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled, settings::Style};

/// An opened board: where it lives, how it is configured, and its store
struct Session {
    home: BoardHome,
    config: Config,
    store: BoardStore<UnifiedStorage>,
}

impl Session {
    fn open(board: Option<&Path>, json: bool) -> Result<Self> {
        let home = match board {
            Some(dir) => BoardHome::at(dir),
            None => BoardHome::find()?,
        };
        let config = home.load_config()?;
        if !config.display.colors {
            colored::control::set_override(false);
        }

        let mut store = home.open_store(&config)?;
        if config.storage.backend == StorageKind::Memory {
            tracing::warn!("memory backend configured; changes are discarded on exit");
        }
        if json {
            // Mutations report through the notifier, one JSON line per event.
            store.subscribe(|event| {
                println!("{}", serde_json::to_string(event)?);
                Ok(())
            });
        }

        Ok(Self {
            home,
            config,
            store,
        })
    }

    fn truncate(&self, text: &str) -> String {
        let max = self.config.display.max_description_length;
        if text.chars().count() <= max {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max.saturating_sub(1)).collect();
            format!("{cut}…")
        }
    }

    fn column_title(&self, column_id: &str) -> String {
        self.store
            .board()
            .find_column(column_id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| column_id.to_string())
    }
}

pub fn init(global: bool, board: Option<PathBuf>) -> Result<()> {
    let home = match (global, board) {
        (true, _) => BoardHome::init_global()?,
        (false, Some(dir)) => BoardHome::create(dir)?,
        (false, None) => BoardHome::init(&std::env::current_dir()?)?,
    };
    let config = home.load_config()?;
    home.open_store(&config)?;

    println!(
        "{} Initialized kanban board in {}",
        "✓".green(),
        home.dir().display()
    );
    let titles: Vec<_> = config.columns.iter().map(|c| c.title.as_str()).collect();
    println!("  Columns: {}", titles.join(", "));
    Ok(())
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tasks")]
    tasks: usize,
}

pub fn columns(board: Option<&Path>, json: bool) -> Result<()> {
    let session = Session::open(board, false)?;
    let columns = session.store.columns();

    if json {
        println!("{}", serde_json::to_string(columns)?);
        return Ok(());
    }

    let rows: Vec<ColumnRow> = columns
        .iter()
        .map(|c| ColumnRow {
            id: c.id.clone(),
            title: c.title.clone(),
            tasks: c.tasks.len(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub fn add(
    board: Option<&Path>,
    column: &str,
    description: &str,
    id: Option<String>,
    json: bool,
) -> Result<()> {
    let mut session = Session::open(board, json)?;
    let id = id.unwrap_or_else(|| {
        let board = session.store.board();
        generate_unique_id(&session.config.id_prefix, |candidate| {
            board.contains_task(candidate)
        })
    });

    session
        .store
        .add_task(column, Task::new(id.clone(), description))?;

    if !json {
        println!(
            "{} Added {} to {}",
            "✓".green(),
            id.cyan(),
            session.column_title(column)
        );
    }
    Ok(())
}

pub fn list(board: Option<&Path>, column: Option<String>, json: bool) -> Result<()> {
    let session = Session::open(board, false)?;

    let columns: Vec<_> = match column {
        Some(ref id) => {
            let Some(found) = session.store.board().find_column(id) else {
                bail!("Column not found: {}", id);
            };
            vec![found]
        }
        None => session.store.columns().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string(&columns)?);
        return Ok(());
    }

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if session.config.display.show_count {
            println!(
                "{} {}",
                column.title.bold(),
                format!("({})", column.tasks.len()).dimmed()
            );
        } else {
            println!("{}", column.title.bold());
        }
        if column.tasks.is_empty() {
            println!("  {}", "no tasks".dimmed());
        }
        for (index, task) in column.tasks.iter().enumerate() {
            println!(
                "  {:>2}. {} {}",
                index,
                task.id.cyan(),
                session.truncate(&task.description)
            );
        }
    }

    Ok(())
}

pub fn show(board: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let session = Session::open(board, false)?;
    let (column, task) = session
        .store
        .find_task(id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;
    let index = column.position(id).unwrap_or_default();

    if json {
        let value = serde_json::json!({
            "task": task,
            "columnId": column.id,
            "index": index,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", task.id.cyan().bold());
        println!();
        println!("Column:   {} ({})", column.title, column.id);
        println!("Position: {} of {}", index + 1, column.tasks.len());
        println!();
        println!("{}", task.description);
    }

    Ok(())
}

pub fn edit(board: Option<&Path>, id: &str, description: &str, json: bool) -> Result<()> {
    let mut session = Session::open(board, json)?;
    session.store.update_task_description(id, description)?;

    if !json {
        println!("{} Updated {}", "✓".green(), id.cyan());
    }
    Ok(())
}

pub fn mv(
    board: Option<&Path>,
    id: &str,
    column: &str,
    index: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut session = Session::open(board, json)?;
    let (source, task) = session
        .store
        .find_task(id)
        .map(|(c, t)| (c.id.clone(), t.clone()))
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    let landed = session.store.move_task(&source, column, &task, index)?;

    if !json {
        println!(
            "{} Moved {} to {} at position {}",
            "✓".green(),
            id.cyan(),
            session.column_title(column),
            landed
        );
    }
    Ok(())
}

/// Move a task as a drag would: `zone` counts drop zones from the top of the column
pub fn drop(board: Option<&Path>, id: &str, column: &str, zone: usize, json: bool) -> Result<()> {
    let mut session = Session::open(board, json)?;
    let target = DropTarget::from_zone(session.store.board(), column, zone)?;
    let landed = session.store.apply_drop(id, &target)?;

    if !json {
        println!(
            "{} Dropped {} in {} at position {}",
            "✓".green(),
            id.cyan(),
            session.column_title(column),
            landed
        );
    }
    Ok(())
}

pub fn rm(board: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let mut session = Session::open(board, json)?;
    let task = session.store.delete_task(id)?;

    if !json {
        println!(
            "{} Deleted {} {}",
            "✓".green(),
            task.id.cyan(),
            session.truncate(&task.description).dimmed()
        );
    }
    Ok(())
}

/// Drop every task by removing the stored snapshot
pub fn reset(board: Option<&Path>, yes: bool) -> Result<()> {
    let session = Session::open(board, false)?;
    let count = session.store.board().task_count();

    if !yes {
        bail!(
            "This deletes {} task(s). Re-run with --yes to confirm.",
            count
        );
    }

    let dir = session.config.storage_dir(session.home.dir());
    clear_snapshot(&dir, &session.config.storage.key)?;
    // Reopening writes fresh empty columns.
    session.home.open_store(&session.config)?;

    println!("{} Board reset ({} task(s) removed)", "✓".green(), count);
    Ok(())
}

pub fn config_show(board: Option<&Path>, json: bool) -> Result<()> {
    let session = Session::open(board, false)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.config)?);
    } else {
        let content = toml::to_string_pretty(&session.config)?;
        println!("{}", "Current configuration:".bold());
        println!();
        println!("{}", content.trim_end());
    }
    Ok(())
}

pub fn config_path(board: Option<&Path>) -> Result<()> {
    let home = match board {
        Some(dir) => BoardHome::at(dir),
        None => BoardHome::find()?,
    };
    println!("{}", home.config_path().display());
    Ok(())
}
