//! BoardContext - access to storage and engines for every command
//!
//! Like the stores, the context holds no business logic. Commands do the work.

use crate::config::BoardkeepConfig;
use crate::engine::MoveEngine;
use crate::error::{BoardkeepError, Result};
use crate::store::{ActivityLog, Backend, BoardStore, FileStore, MemoryStore, OrderedStore};
use crate::types::{Board, BoardId, Column, Task};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Context passed to every command
pub struct BoardContext {
    boards: Arc<dyn BoardStore>,
    activity: Arc<dyn ActivityLog>,
    columns: MoveEngine<Column>,
    tasks: MoveEngine<Task>,
    /// Serializes board create/rename/delete so global name checks hold
    board_writes: Mutex<()>,
    config: BoardkeepConfig,
}

impl BoardContext {
    /// Wire every collaborator to the same backend
    pub fn new<B>(backend: Arc<B>, config: BoardkeepConfig) -> Self
    where
        B: Backend + 'static,
    {
        let options = config.move_options();
        let column_store: Arc<dyn OrderedStore<Column>> = backend.clone();
        let task_store: Arc<dyn OrderedStore<Task>> = backend.clone();
        let boards: Arc<dyn BoardStore> = backend.clone();
        let activity: Arc<dyn ActivityLog> = backend;

        Self {
            boards,
            activity,
            columns: MoveEngine::with_options(column_store, options.clone()),
            tasks: MoveEngine::with_options(task_store, options),
            board_writes: Mutex::new(()),
            config,
        }
    }

    /// Process-local context with default settings
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), BoardkeepConfig::default())
    }

    /// File-backed context at `config.root`, creating the directories if needed
    pub async fn open(config: BoardkeepConfig) -> Result<Self> {
        let store = FileStore::new(&config.root).with_lock_timeout(config.lock_timeout());
        store.ensure_directories().await?;
        debug!(root = %config.root.display(), "opened file store");
        Ok(Self::new(Arc::new(store), config))
    }

    pub fn boards(&self) -> &dyn BoardStore {
        self.boards.as_ref()
    }

    pub fn activity(&self) -> &dyn ActivityLog {
        self.activity.as_ref()
    }

    pub fn columns(&self) -> &MoveEngine<Column> {
        &self.columns
    }

    pub fn tasks(&self) -> &MoveEngine<Task> {
        &self.tasks
    }

    pub fn config(&self) -> &BoardkeepConfig {
        &self.config
    }

    /// Held while a board is created, renamed or deleted
    pub async fn lock_boards(&self) -> MutexGuard<'_, ()> {
        self.board_writes.lock().await
    }

    /// Read a board, failing when it does not exist
    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        self.boards
            .get_board(id)
            .await?
            .ok_or_else(|| BoardkeepError::not_found("board", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_context() {
        let ctx = BoardContext::in_memory();
        let board = ctx.boards().save_board(&Board::new("B")).await.unwrap();
        assert_eq!(ctx.read_board(&board.id).await.unwrap().name, "B");

        let missing = ctx.read_board(&BoardId::from_string("nope")).await;
        assert!(matches!(missing, Err(BoardkeepError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_open_creates_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".boardkeep");
        let config = BoardkeepConfig::default().with_root(&root);

        let ctx = BoardContext::open(config).await.unwrap();
        assert!(root.join("boards").is_dir());
        assert!(root.join("tasks").is_dir());
        assert_eq!(ctx.config().root, root);
    }

    #[tokio::test]
    async fn test_engines_take_configured_options() {
        let config = BoardkeepConfig {
            strict_positions: true,
            ..Default::default()
        };
        let ctx = BoardContext::new(Arc::new(MemoryStore::new()), config);
        assert!(ctx.tasks().options().strict_positions);
        assert!(ctx.columns().options().strict_positions);
    }
}
