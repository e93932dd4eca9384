//! kanban - Local kanban task board
//!
//! Columns come from .kanban/config.toml, tasks live in a JSON snapshot beside it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Local kanban task board")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Board directory (the .kanban directory itself)
    #[arg(long, global = true, env = "KANBAN_DIR")]
    board: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new board
    Init {
        /// Create the per-user board instead of one in the current directory
        #[arg(long)]
        global: bool,
    },

    /// Show columns and their task counts
    Columns,

    /// Add a task to the end of a column
    Add {
        /// Column ID
        column: String,

        /// Task description
        description: String,

        /// Task ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List tasks
    List {
        /// Only this column
        column: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Change a task's description
    Edit {
        /// Task ID
        id: String,

        /// New description
        description: String,
    },

    /// Move a task to a column position
    Mv {
        /// Task ID
        id: String,

        /// Target column ID
        column: String,

        /// Position after the move (end of column when omitted)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Move a task onto a drop zone, as dragging a card would
    Drop {
        /// Task ID
        id: String,

        /// Target column ID
        column: String,

        /// Drop zone: 0 is above the first card, N is below the Nth
        zone: usize,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },

    /// Delete every task, keeping the columns
    Reset {
        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let board = cli.board.as_deref();

    match cli.command {
        Commands::Init { global } => commands::init(global, cli.board.clone()),
        Commands::Columns => commands::columns(board, cli.json),
        Commands::Add {
            column,
            description,
            id,
        } => commands::add(board, &column, &description, id, cli.json),
        Commands::List { column } => commands::list(board, column, cli.json),
        Commands::Show { id } => commands::show(board, &id, cli.json),
        Commands::Edit { id, description } => commands::edit(board, &id, &description, cli.json),
        Commands::Mv { id, column, index } => commands::mv(board, &id, &column, index, cli.json),
        Commands::Drop { id, column, zone } => {
            commands::drop(board, &id, &column, zone, cli.json)
        }
        Commands::Rm { id } => commands::rm(board, &id, cli.json),
        Commands::Reset { yes } => commands::reset(board, yes),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(board, cli.json),
            Some(ConfigCommands::Path) => commands::config_path(board),
        },
    }
}
