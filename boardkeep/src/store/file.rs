//! File-backed backend: one JSON document per entity
//!
//! ```text
//! root/
//! ├── .lock                  # fs2 exclusive lock held while writing
//! ├── boards/{id}.json
//! ├── columns/{id}.json
//! ├── tasks/{id}.json
//! └── activity/current.jsonl # one LogEntry per line, oldest first
//! ```

use super::{sort_siblings, ActivityLog, BoardStore, ChangeSet, OrderedStore, StoreGuard};
use crate::error::{BoardkeepError, Result};
use crate::types::{Board, Column, Id, Positioned, Task};
use async_trait::async_trait;
use boardkeep_operations::LogEntry;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

const LOCK_POLL: Duration = Duration::from_millis(10);
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

/// Positioned items that live in their own directory
pub trait Document: Positioned + Serialize + DeserializeOwned {
    const DIR: &'static str;
    const PARENT_DIR: &'static str;
}

impl Document for Column {
    const DIR: &'static str = "columns";
    const PARENT_DIR: &'static str = "boards";
}

impl Document for Task {
    const DIR: &'static str = "tasks";
    const PARENT_DIR: &'static str = "columns";
}

/// Store rooted at a directory. Several processes may share the directory;
/// every write takes the `.lock` file first.
pub struct FileStore {
    root: PathBuf,
    lock_timeout: Duration,
    /// Queues this process's sequences before they poll the `.lock` file
    sequences: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            sequences: Arc::new(Mutex::new(())),
        }
    }

    /// How long a writer waits for another process to release the lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    pub fn activity_path(&self) -> PathBuf {
        self.root.join("activity").join("current.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    fn dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn doc_path(&self, dir: &str, id: &Id) -> PathBuf {
        self.dir(dir).join(format!("{}.json", id))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if all required directories exist
    pub fn directories_exist(&self) -> bool {
        ["boards", Column::DIR, Task::DIR, "activity"]
            .iter()
            .all(|dir| self.dir(dir).is_dir())
    }

    /// Idempotent
    pub async fn create_directories(&self) -> Result<()> {
        for dir in ["boards", Column::DIR, Task::DIR, "activity"] {
            fs::create_dir_all(self.dir(dir)).await?;
        }
        Ok(())
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire the exclusive store lock without waiting
    pub fn try_lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();
        std::fs::create_dir_all(&self.root)?;

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(BoardkeepError::LockBusy),
        }
    }

    /// Acquire the store lock, polling until the lock timeout elapses
    pub async fn lock(&self) -> Result<StoreLock> {
        let started = Instant::now();
        loop {
            match self.try_lock() {
                Err(BoardkeepError::LockBusy) if started.elapsed() < self.lock_timeout => {
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(BoardkeepError::LockBusy) => {
                    return Err(BoardkeepError::LockTimeout {
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    })
                }
                other => return other,
            }
        }
    }

    /// Hold the store lock for a whole read-compute-commit sequence
    async fn lock_sequence(&self) -> Result<StoreGuard> {
        let queued = self.sequences.clone().lock_owned().await;
        let lock = self.lock().await?;
        Ok(StoreGuard::holding((lock, queued)))
    }

    // =========================================================================
    // Document I/O
    // =========================================================================

    async fn read_doc<D: DeserializeOwned>(&self, path: &Path) -> Result<Option<D>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_all_docs<D: DeserializeOwned>(&self, dir: &str) -> Result<Vec<D>> {
        let dir = self.dir(dir);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            // A concurrent delete may remove the file between listing and reading
            match self.read_doc(&path).await {
                Ok(Some(doc)) => docs.push(doc),
                Ok(None) => trace!("{} vanished while listing", path.display()),
                Err(BoardkeepError::Json(e)) => {
                    warn!(path = %path.display(), "skipping malformed document: {}", e)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(docs)
    }

    async fn write_doc<D: Serialize>(&self, dir: &str, id: &Id, doc: &D) -> Result<()> {
        self.ensure_directories().await?;
        let content = serde_json::to_string_pretty(doc)?;
        let _lock = self.lock().await?;
        atomic_write(&self.doc_path(dir, id), content.as_bytes()).await
    }

    async fn remove_doc(&self, dir: &str, id: &Id) -> Result<bool> {
        let _lock = self.lock().await?;
        remove_if_exists(&self.doc_path(dir, id)).await
    }
}

/// RAII lock guard - releases on drop
pub struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[async_trait]
impl<T: Document> OrderedStore<T> for FileStore {
    async fn list_by_parent(&self, parent: &Id) -> Result<Vec<T>> {
        let mut items: Vec<T> = self
            .read_all_docs::<T>(T::DIR)
            .await?
            .into_iter()
            .filter(|item| item.parent_id() == parent)
            .collect();
        sort_siblings(&mut items);
        Ok(items)
    }

    async fn get(&self, id: &Id) -> Result<Option<T>> {
        self.read_doc(&self.doc_path(T::DIR, id)).await
    }

    async fn save(&self, item: &T) -> Result<T> {
        self.write_doc(T::DIR, item.id(), item).await?;
        Ok(item.clone())
    }

    async fn delete(&self, id: &Id) -> Result<bool> {
        self.remove_doc(T::DIR, id).await
    }

    async fn parent_exists(&self, parent: &Id) -> Result<bool> {
        Ok(fs::try_exists(self.doc_path(T::PARENT_DIR, parent)).await?)
    }

    async fn begin(&self) -> Result<StoreGuard> {
        self.lock_sequence().await
    }

    /// Serialize everything, stage every temp file, then rename them all and
    /// apply the deletes. A failure while staging leaves the stored documents
    /// untouched. The store lock is taken here unless `scope` already holds it.
    async fn commit(&self, changes: ChangeSet<T>, scope: &StoreGuard) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        self.ensure_directories().await?;

        let mut rendered = Vec::with_capacity(changes.saves.len());
        for item in &changes.saves {
            rendered.push((
                self.doc_path(T::DIR, item.id()),
                serde_json::to_string_pretty(item)?,
            ));
        }

        let _lock = if scope.is_held() {
            None
        } else {
            Some(self.lock().await?)
        };

        let mut staged = Vec::with_capacity(rendered.len());
        for (path, content) in &rendered {
            let temp = path.with_extension("tmp");
            if let Err(e) = fs::write(&temp, content).await {
                discard_staged(&staged).await;
                let _ = fs::remove_file(&temp).await;
                return Err(e.into());
            }
            staged.push((temp, path));
        }

        for (temp, path) in &staged {
            fs::rename(temp, path).await?;
        }
        for id in &changes.deletes {
            remove_if_exists(&self.doc_path(T::DIR, id)).await?;
        }

        debug!(
            kind = T::KIND,
            saved = staged.len(),
            deleted = changes.deletes.len(),
            "committed change set"
        );
        Ok(())
    }
}

#[async_trait]
impl BoardStore for FileStore {
    async fn list_boards(&self) -> Result<Vec<Board>> {
        let mut boards: Vec<Board> = self.read_all_docs("boards").await?;
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(boards)
    }

    async fn get_board(&self, id: &Id) -> Result<Option<Board>> {
        self.read_doc(&self.doc_path("boards", id)).await
    }

    async fn save_board(&self, board: &Board) -> Result<Board> {
        self.write_doc("boards", &board.id, board).await?;
        Ok(board.clone())
    }

    async fn delete_board(&self, id: &Id) -> Result<bool> {
        self.remove_doc("boards", id).await
    }
}

#[async_trait]
impl ActivityLog for FileStore {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        let path = self.activity_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let content = match fs::read_to_string(self.activity_path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries: Vec<LogEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .filter_map(|(number, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(line = number + 1, "skipping malformed activity entry: {}", e);
                    None
                }
            })
            .collect();
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn discard_staged(staged: &[(PathBuf, &PathBuf)]) {
    for (temp, _) in staged {
        let _ = fs::remove_file(temp).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join(".boardkeep"));
        store.create_directories().await.unwrap();
        (temp, store)
    }

    #[tokio::test]
    async fn test_create_directories_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join(".boardkeep"));
        assert!(!store.directories_exist());

        store.ensure_directories().await.unwrap();
        store.ensure_directories().await.unwrap();
        assert!(store.directories_exist());
        assert!(store.boards_dir().is_dir());
    }

    #[tokio::test]
    async fn test_board_io() {
        let (_temp, store) = setup().await;
        let board = store.save_board(&Board::new("Roadmap")).await.unwrap();

        let loaded = store.get_board(&board.id).await.unwrap().unwrap();
        assert_eq!(loaded, board);
        assert!(store.board_name_exists("Roadmap").await.unwrap());

        assert!(store.delete_board(&board.id).await.unwrap());
        assert!(!store.delete_board(&board.id).await.unwrap());
        assert!(store.get_board(&board.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tasks_listed_by_parent_in_position_order() {
        let (_temp, store) = setup().await;
        let column = Id::from_string("col");
        for (title, position) in [("second", 1), ("first", 0), ("third", 2)] {
            let mut task = Task::new(&column, title);
            task.position = position;
            OrderedStore::<Task>::save(&store, &task).await.unwrap();
        }
        OrderedStore::<Task>::save(&store, &Task::new("elsewhere", "other"))
            .await
            .unwrap();

        let tasks = OrderedStore::<Task>::list_by_parent(&store, &column)
            .await
            .unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_commit_leaves_no_temp_files() {
        let (_temp, store) = setup().await;
        let a = Task::new("col", "a");
        let b = Task::new("col", "b");
        OrderedStore::<Task>::save(&store, &a).await.unwrap();

        let mut changes = ChangeSet::new();
        changes.save(b.clone());
        changes.delete(a.id.clone());
        OrderedStore::<Task>::commit(&store, changes, &StoreGuard::local())
            .await
            .unwrap();

        assert!(OrderedStore::<Task>::get(&store, &a.id).await.unwrap().is_none());
        assert!(OrderedStore::<Task>::get(&store, &b.id).await.unwrap().is_some());

        let leftovers: Vec<_> = std::fs::read_dir(store.root().join("tasks"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_parent_exists_checks_parent_directory() {
        let (_temp, store) = setup().await;
        let board = store.save_board(&Board::new("B")).await.unwrap();
        let column = Column::new(&board.id, "Todo");
        OrderedStore::<Column>::save(&store, &column).await.unwrap();

        assert!(OrderedStore::<Column>::parent_exists(&store, &board.id).await.unwrap());
        assert!(OrderedStore::<Task>::parent_exists(&store, &column.id).await.unwrap());
        assert!(!OrderedStore::<Task>::parent_exists(&store, &board.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_locking() {
        let (_temp, store) = setup().await;

        let lock1 = store.try_lock().unwrap();
        assert!(matches!(store.try_lock(), Err(BoardkeepError::LockBusy)));

        drop(lock1);
        let _lock2 = store.try_lock().unwrap();
    }

    #[tokio::test]
    async fn test_lock_times_out_while_held() {
        let (_temp, store) = setup().await;
        let store = store.with_lock_timeout(Duration::from_millis(30));

        let _held = store.try_lock().unwrap();
        let result = store.lock().await;
        assert!(matches!(result, Err(BoardkeepError::LockTimeout { .. })));
    }

    #[tokio::test]
    async fn test_sequence_holds_lock_until_dropped() {
        let (_temp, store) = setup().await;
        let store = store.with_lock_timeout(Duration::from_millis(30));
        let other = FileStore::new(store.root()).with_lock_timeout(Duration::from_millis(30));

        let scope = OrderedStore::<Task>::begin(&store).await.unwrap();
        assert!(scope.is_held());
        // A second store on the same root stands in for another process
        let blocked = OrderedStore::<Task>::begin(&other).await;
        assert!(matches!(blocked, Err(BoardkeepError::LockTimeout { .. })));

        // Commits inside the sequence reuse its lock
        let mut changes = ChangeSet::new();
        changes.save(Task::new("col", "inside"));
        OrderedStore::<Task>::commit(&store, changes, &scope).await.unwrap();

        drop(scope);
        assert!(OrderedStore::<Task>::begin(&other).await.unwrap().is_held());
    }

    #[tokio::test]
    async fn test_malformed_documents_are_skipped() {
        let (_temp, store) = setup().await;
        let task = Task::new("col", "fine");
        OrderedStore::<Task>::save(&store, &task).await.unwrap();
        std::fs::write(store.root().join("tasks").join("broken.json"), "{ not json").unwrap();

        let tasks = OrderedStore::<Task>::list_by_parent(&store, &Id::from_string("col"))
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, task.id);
    }

    #[tokio::test]
    async fn test_malformed_activity_lines_are_skipped() {
        let (_temp, store) = setup().await;
        let entry = LogEntry::new("add task", serde_json::Value::Null, serde_json::Value::Null, None, 1);
        store.append(&entry).await.unwrap();
        let mut log = std::fs::OpenOptions::new()
            .append(true)
            .open(store.activity_path())
            .unwrap();
        std::io::Write::write_all(&mut log, b"garbage\n").unwrap();

        let entries = store.read(None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, "add task");
    }

    #[tokio::test]
    async fn test_activity_log_round_trip() {
        let (_temp, store) = setup().await;
        assert!(store.read(None).await.unwrap().is_empty());

        for op in ["create board", "add task"] {
            let entry = LogEntry::new(op, serde_json::Value::Null, serde_json::Value::Null, None, 1);
            store.append(&entry).await.unwrap();
        }

        let entries = store.read(None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].op, "add task");
        assert!(store.activity_path().exists());
    }
}
