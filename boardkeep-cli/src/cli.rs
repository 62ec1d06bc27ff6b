//! CLI definition for the boardkeep command-line interface

use std::path::PathBuf;

use boardkeep::Priority;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Boardkeep - kanban boards with stable, gap-free ordering
#[derive(Parser, Debug)]
#[command(name = "boardkeep")]
#[command(version)]
#[command(about = "Manage boards, columns and tasks from the command line")]
pub struct Cli {
    /// Data directory (overrides the `root` config value)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Name recorded with every logged operation
    #[arg(long, global = true)]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, inspect and delete boards
    #[command(subcommand)]
    Board(BoardCommand),
    /// Manage the columns of a board
    #[command(subcommand)]
    Column(ColumnCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Inspect the operation log
    #[command(subcommand)]
    Activity(ActivityCommand),
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Create a board with the default columns
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a board with its columns and tasks
    Get { id: String },
    /// List boards, newest first
    List,
    /// Rename a board or change its description
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a board and everything on it
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ColumnCommand {
    /// Add a column to a board
    Add {
        board: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
    },
    /// Show a column
    Get { id: String },
    /// List the columns of a board
    List { board: String },
    /// Rename or recolor a column
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a column and its tasks
    Delete { id: String },
    /// Move a column to a new position on its board
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        position: i64,
        /// Fail unless the column is on this board
        #[arg(long)]
        board: Option<String>,
    },
}

/// Optional task fields shared by add and update
#[derive(Args, Debug, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub description: Option<String>,
    /// low, medium, high or urgent
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub color: Option<String>,
    /// RFC 3339 timestamp, e.g. 2026-01-31T17:00:00Z
    #[arg(long)]
    pub due: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task to a column
    Add {
        column: String,
        title: String,
        #[command(flatten)]
        fields: TaskFields,
        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
    },
    /// Show a task
    Get { id: String },
    /// List the tasks of a column or a board
    List {
        #[arg(long, conflicts_with = "board", required_unless_present = "board")]
        column: Option<String>,
        #[arg(long)]
        board: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        due_after: Option<DateTime<Utc>>,
        #[arg(long)]
        due_before: Option<DateTime<Utc>>,
    },
    /// Edit task fields
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Delete a task
    Delete { id: String },
    /// Move a task within its column, or to another column with --column
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        position: i64,
        #[arg(long)]
        column: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommand {
    /// List logged operations, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}
