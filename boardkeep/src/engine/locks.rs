//! Per-parent mutual exclusion

use crate::types::Id;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per parent id, created on first use.
///
/// Every read-modify-write of a sibling list runs while holding the mutex of
/// that parent. Slots are never removed, so two callers always contend on the
/// same mutex for the same parent.
#[derive(Debug, Default, Clone)]
pub struct ParentLocks {
    slots: Arc<DashMap<Id, Arc<Mutex<()>>>>,
}

/// Held parent locks, released on drop
#[derive(Debug)]
pub struct ParentGuard {
    parents: Vec<Id>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl ParentGuard {
    /// Whether `parent` is one of the locked parents
    pub fn covers(&self, parent: &Id) -> bool {
        self.parents.contains(parent)
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl ParentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, parent: &Id) -> Arc<Mutex<()>> {
        // The shard guard must not be held across an await
        self.slots.entry(parent.clone()).or_default().value().clone()
    }

    /// Lock a single parent
    pub async fn lock(&self, parent: &Id) -> ParentGuard {
        ParentGuard {
            guards: vec![self.slot(parent).lock_owned().await],
            parents: vec![parent.clone()],
        }
    }

    /// Lock two parents in ascending id order; the same id is locked once
    pub async fn lock_pair(&self, a: &Id, b: &Id) -> ParentGuard {
        if a == b {
            return self.lock(a).await;
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let parents = vec![first.clone(), second.clone()];
        let first = self.slot(first).lock_owned().await;
        let second = self.slot(second).lock_owned().await;
        ParentGuard {
            parents,
            guards: vec![first, second],
        }
    }

    /// Number of parents seen so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_parent_is_exclusive() {
        let locks = ParentLocks::new();
        let parent = Id::from_string("col");

        let held = locks.lock(&parent).await;
        let waiting = tokio::time::timeout(Duration::from_millis(20), locks.lock(&parent)).await;
        assert!(waiting.is_err());

        drop(held);
        let _again = locks.lock(&parent).await;
    }

    #[tokio::test]
    async fn test_different_parents_do_not_block() {
        let locks = ParentLocks::new();
        let _a = locks.lock(&Id::from_string("a")).await;
        let _b = locks.lock(&Id::from_string("b")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_pair_of_one_parent_locks_once() {
        let locks = ParentLocks::new();
        let parent = Id::from_string("col");
        let guard = locks.lock_pair(&parent, &parent).await;
        assert_eq!(guard.len(), 1);
        assert!(guard.covers(&parent));
        assert!(!guard.covers(&Id::from_string("other")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opposite_pair_order_does_not_deadlock() {
        let locks = ParentLocks::new();
        let a = Id::from_string("a");
        let b = Id::from_string("b");

        let mut handles = Vec::new();
        for i in 0..50 {
            let locks = locks.clone();
            let (x, y) = if i % 2 == 0 {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            handles.push(tokio::spawn(async move {
                let guard = locks.lock_pair(&x, &y).await;
                tokio::task::yield_now().await;
                guard.len()
            }));
        }

        let all = async {
            for handle in handles {
                assert_eq!(handle.await.unwrap(), 2);
            }
        };
        tokio::time::timeout(Duration::from_secs(5), all)
            .await
            .expect("lock_pair deadlocked");
    }
}
