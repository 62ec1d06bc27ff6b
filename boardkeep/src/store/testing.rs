//! A backend that records commits and fails them on request

use super::{ActivityLog, BoardStore, ChangeSet, MemoryStore, OrderedStore, StoreGuard};
use crate::error::{BoardkeepError, Result};
use crate::types::{Board, Id, Positioned};
use async_trait::async_trait;
use boardkeep_operations::LogEntry;
use std::collections::HashSet;
use std::sync::Mutex;

/// [`MemoryStore`] wrapper. Reads and plain writes pass through; commits are
/// recorded and can be made to fail per item kind.
#[derive(Default)]
pub(crate) struct ScriptedStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<&'static str>>,
    saved: Mutex<Vec<Id>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later commit of `kind` ("column", "task") fails with an I/O error
    pub fn fail_commits(&self, kind: &'static str) {
        self.failing.lock().unwrap().insert(kind);
    }

    /// Ids saved by successful commits, in commit order
    pub fn committed_saves(&self) -> Vec<Id> {
        self.saved.lock().unwrap().clone()
    }

    pub fn forget_commits(&self) {
        self.saved.lock().unwrap().clear();
    }
}

#[async_trait]
impl<T> OrderedStore<T> for ScriptedStore
where
    T: Positioned,
    MemoryStore: OrderedStore<T>,
{
    async fn list_by_parent(&self, parent: &Id) -> Result<Vec<T>> {
        OrderedStore::<T>::list_by_parent(&self.inner, parent).await
    }

    async fn get(&self, id: &Id) -> Result<Option<T>> {
        OrderedStore::<T>::get(&self.inner, id).await
    }

    async fn save(&self, item: &T) -> Result<T> {
        OrderedStore::<T>::save(&self.inner, item).await
    }

    async fn delete(&self, id: &Id) -> Result<bool> {
        OrderedStore::<T>::delete(&self.inner, id).await
    }

    async fn parent_exists(&self, parent: &Id) -> Result<bool> {
        OrderedStore::<T>::parent_exists(&self.inner, parent).await
    }

    async fn commit(&self, changes: ChangeSet<T>, scope: &StoreGuard) -> Result<()> {
        let refused = self.failing.lock().unwrap().contains(T::KIND);
        if refused {
            return Err(BoardkeepError::Io(std::io::Error::other(format!(
                "{} commit refused",
                T::KIND
            ))));
        }
        let ids: Vec<Id> = changes.saves.iter().map(|item| item.id().clone()).collect();
        OrderedStore::<T>::commit(&self.inner, changes, scope).await?;
        self.saved.lock().unwrap().extend(ids);
        Ok(())
    }
}

#[async_trait]
impl BoardStore for ScriptedStore {
    async fn list_boards(&self) -> Result<Vec<Board>> {
        self.inner.list_boards().await
    }

    async fn get_board(&self, id: &Id) -> Result<Option<Board>> {
        self.inner.get_board(id).await
    }

    async fn save_board(&self, board: &Board) -> Result<Board> {
        self.inner.save_board(board).await
    }

    async fn delete_board(&self, id: &Id) -> Result<bool> {
        self.inner.delete_board(id).await
    }
}

#[async_trait]
impl ActivityLog for ScriptedStore {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.inner.append(entry).await
    }

    async fn read(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        self.inner.read(limit).await
    }
}
