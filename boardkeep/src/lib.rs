//! # Boardkeep
//!
//! Kanban boards whose columns and tasks keep contiguous, zero-based
//! positions through every insert, reorder, move between parents and delete,
//! including when many requests touch the same parent at once.
//!
//! ## Layout
//!
//! - [`reindex`]: pure functions that stamp positions `0..n` on an ordered list
//! - [`store`]: the persistence traits, with in-memory and file backends
//! - [`engine`]: [`MoveEngine`], which locks parents, reindexes and commits
//! - [`board`], [`column`], [`task`], [`activity`]: commands, each an
//!   `#[operation]` struct implementing [`Execute`]
//!
//! ## Usage
//!
//! ```ignore
//! use boardkeep::{board::CreateBoard, task::{AddTask, MoveTask}, BoardContext, Execute};
//!
//! let ctx = BoardContext::in_memory();
//! let board = CreateBoard::new("Roadmap").execute(&ctx).await.into_result()?;
//! let todo = board["columns"][0]["id"].as_str().unwrap();
//! let task = AddTask::new(todo, "Write docs").execute(&ctx).await.into_result()?;
//! MoveTask::new(task["id"].as_str().unwrap(), 0).execute(&ctx).await.into_result()?;
//! ```

pub mod activity;
pub mod board;
pub mod column;
mod config;
mod context;
pub mod defaults;
pub mod engine;
mod error;
mod processor;
pub mod reindex;
pub mod store;
pub mod task;
pub mod types;
pub mod validate;

pub use boardkeep_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::BoardkeepConfig;
pub use context::BoardContext;
pub use engine::{MoveEngine, MoveOptions};
pub use error::{BoardkeepError, Result};
pub use processor::BoardkeepProcessor;
pub use store::{FileStore, MemoryStore};

pub use types::{Board, BoardId, Column, ColumnId, Id, Positioned, Priority, Task, TaskId};
