//! Persistence collaborators
//!
//! The move engine and the commands only see these traits. Two backends are
//! provided and are interchangeable: [`MemoryStore`] and [`FileStore`].

mod file;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{Board, Column, Id, Positioned, Task};
use async_trait::async_trait;
use boardkeep_operations::LogEntry;
use std::any::Any;

/// The writes of one reindex pass, applied by [`OrderedStore::commit`] as a unit
#[derive(Debug, Clone)]
pub struct ChangeSet<T> {
    pub saves: Vec<T>,
    pub deletes: Vec<Id>,
}

impl<T> ChangeSet<T> {
    pub fn new() -> Self {
        Self {
            saves: Vec::new(),
            deletes: Vec::new(),
        }
    }

    pub fn save(&mut self, item: T) {
        self.saves.push(item);
    }

    pub fn delete(&mut self, id: Id) {
        self.deletes.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty() && self.deletes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.saves.len() + self.deletes.len()
    }
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to a backend for one read-compute-commit sequence.
///
/// Released on drop. Backends reachable from a single process hand out an
/// empty guard and rely on the engine's parent locks.
pub struct StoreGuard {
    held: Option<Box<dyn Any + Send + Sync>>,
}

impl StoreGuard {
    pub fn local() -> Self {
        Self { held: None }
    }

    /// Keep `lock` alive for as long as the guard
    pub fn holding<L: Any + Send + Sync>(lock: L) -> Self {
        Self {
            held: Some(Box::new(lock)),
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}

impl std::fmt::Debug for StoreGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

/// Storage of positioned items (columns under boards, tasks under columns)
#[async_trait]
pub trait OrderedStore<T: Positioned>: Send + Sync {
    /// All children of `parent`, ascending by position (ties broken by id)
    async fn list_by_parent(&self, parent: &Id) -> Result<Vec<T>>;

    async fn get(&self, id: &Id) -> Result<Option<T>>;

    /// Upsert
    async fn save(&self, item: &T) -> Result<T>;

    /// Returns false when there was nothing to delete
    async fn delete(&self, id: &Id) -> Result<bool>;

    /// Whether the parent entity (board for columns, column for tasks) exists
    async fn parent_exists(&self, parent: &Id) -> Result<bool>;

    /// Case-sensitive exact match among the children of `parent`
    async fn exists_by_parent_and_name(&self, parent: &Id, name: &str) -> Result<bool> {
        Ok(self
            .list_by_parent(parent)
            .await?
            .iter()
            .any(|item| item.name() == name))
    }

    /// Start a read-compute-commit sequence. While the guard lives no other
    /// holder, in this process or another, can commit to the backend.
    async fn begin(&self) -> Result<StoreGuard> {
        Ok(StoreGuard::local())
    }

    /// Apply every save and delete of `changes`, all or nothing, within the
    /// sequence opened by `scope`.
    ///
    /// The default applies them one by one and is only as atomic as the
    /// individual calls; backends override it.
    async fn commit(&self, changes: ChangeSet<T>, _scope: &StoreGuard) -> Result<()> {
        for item in &changes.saves {
            self.save(item).await?;
        }
        for id in &changes.deletes {
            self.delete(id).await?;
        }
        Ok(())
    }
}

/// Storage of boards
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Newest first
    async fn list_boards(&self) -> Result<Vec<Board>>;

    async fn get_board(&self, id: &Id) -> Result<Option<Board>>;

    async fn save_board(&self, board: &Board) -> Result<Board>;

    async fn delete_board(&self, id: &Id) -> Result<bool>;

    async fn board_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_boards().await?.iter().any(|b| b.name == name))
    }
}

/// Append-only operation log
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Newest first
    async fn read(&self, limit: Option<usize>) -> Result<Vec<LogEntry>>;
}

/// Everything a [`crate::BoardContext`] needs from one backend
pub trait Backend: BoardStore + OrderedStore<Column> + OrderedStore<Task> + ActivityLog {}

impl<B> Backend for B where B: BoardStore + OrderedStore<Column> + OrderedStore<Task> + ActivityLog {}

/// Sort children the way `list_by_parent` promises
pub(crate) fn sort_siblings<T: Positioned>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| a.id().cmp(b.id()))
    });
}
