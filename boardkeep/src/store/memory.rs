//! In-memory backend

use super::{sort_siblings, ActivityLog, BoardStore, ChangeSet, OrderedStore, StoreGuard};
use crate::error::Result;
use crate::types::{Board, Column, Id, Positioned, Task};
use async_trait::async_trait;
use boardkeep_operations::LogEntry;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store. `commit` applies a whole change set under one write
/// guard, so readers never observe half of a reindex pass.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
pub struct Tables {
    boards: HashMap<Id, Board>,
    columns: HashMap<Id, Column>,
    tasks: HashMap<Id, Task>,
    activity: Vec<LogEntry>,
}

/// Which map holds `T`, and where its parents live
pub trait Table<T> {
    fn rows(&self) -> &HashMap<Id, T>;
    fn rows_mut(&mut self) -> &mut HashMap<Id, T>;
    fn has_parent(&self, parent: &Id) -> bool;
}

impl Table<Column> for Tables {
    fn rows(&self) -> &HashMap<Id, Column> {
        &self.columns
    }

    fn rows_mut(&mut self) -> &mut HashMap<Id, Column> {
        &mut self.columns
    }

    fn has_parent(&self, parent: &Id) -> bool {
        self.boards.contains_key(parent)
    }
}

impl Table<Task> for Tables {
    fn rows(&self) -> &HashMap<Id, Task> {
        &self.tasks
    }

    fn rows_mut(&mut self) -> &mut HashMap<Id, Task> {
        &mut self.tasks
    }

    fn has_parent(&self, parent: &Id) -> bool {
        self.columns.contains_key(parent)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T> OrderedStore<T> for MemoryStore
where
    T: Positioned,
    Tables: Table<T>,
{
    async fn list_by_parent(&self, parent: &Id) -> Result<Vec<T>> {
        let tables = self.tables.read().await;
        let mut items: Vec<T> = Table::<T>::rows(&*tables)
            .values()
            .filter(|item| item.parent_id() == parent)
            .cloned()
            .collect();
        sort_siblings(&mut items);
        Ok(items)
    }

    async fn get(&self, id: &Id) -> Result<Option<T>> {
        let tables = self.tables.read().await;
        Ok(Table::<T>::rows(&*tables).get(id).cloned())
    }

    async fn save(&self, item: &T) -> Result<T> {
        let mut tables = self.tables.write().await;
        Table::<T>::rows_mut(&mut *tables).insert(item.id().clone(), item.clone());
        Ok(item.clone())
    }

    async fn delete(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(Table::<T>::rows_mut(&mut *tables).remove(id).is_some())
    }

    async fn parent_exists(&self, parent: &Id) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(Table::<T>::has_parent(&*tables, parent))
    }

    async fn commit(&self, changes: ChangeSet<T>, _scope: &StoreGuard) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = Table::<T>::rows_mut(&mut *tables);
        for item in changes.saves {
            rows.insert(item.id().clone(), item);
        }
        for id in &changes.deletes {
            rows.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn list_boards(&self) -> Result<Vec<Board>> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables.boards.values().cloned().collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(boards)
    }

    async fn get_board(&self, id: &Id) -> Result<Option<Board>> {
        Ok(self.tables.read().await.boards.get(id).cloned())
    }

    async fn save_board(&self, board: &Board) -> Result<Board> {
        let mut tables = self.tables.write().await;
        tables.boards.insert(board.id.clone(), board.clone());
        Ok(board.clone())
    }

    async fn delete_board(&self, id: &Id) -> Result<bool> {
        Ok(self.tables.write().await.boards.remove(id).is_some())
    }
}

#[async_trait]
impl ActivityLog for MemoryStore {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.tables.write().await.activity.push(entry.clone());
        Ok(())
    }

    async fn read(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let tables = self.tables.read().await;
        let newest_first = tables.activity.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }
}
