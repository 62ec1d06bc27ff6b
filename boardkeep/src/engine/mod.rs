//! The move engine: positional maintenance for columns and tasks
//!
//! Every mutation follows the same shape. Lock the parent(s), re-read the
//! stored state, compute the new sibling order, reindex it, and commit the
//! resulting [`ChangeSet`] as one unit. After any successful call the children
//! of every parent hold exactly the positions `0..count`.

mod locks;

pub use locks::{ParentGuard, ParentLocks};

use crate::error::{BoardkeepError, Result};
use crate::reindex::{insert_clamped, reindex, Placement};
use crate::store::{ChangeSet, OrderedStore, StoreGuard};
use crate::types::{Id, Positioned};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Knobs of the engine, usually taken from [`crate::BoardkeepConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOptions {
    /// Reject negative positions instead of clamping them to 0
    pub strict_positions: bool,
    /// Re-save every sibling, not only those whose position changed
    pub rewrite_unchanged: bool,
    /// How often to retry when a concurrent reparent moves the item away
    pub max_move_attempts: u32,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            strict_positions: false,
            rewrite_unchanged: false,
            max_move_attempts: 5,
        }
    }
}

/// Positional operations over one kind of item
pub struct MoveEngine<T: Positioned> {
    store: Arc<dyn OrderedStore<T>>,
    locks: ParentLocks,
    options: MoveOptions,
}

impl<T: Positioned> MoveEngine<T> {
    pub fn new(store: Arc<dyn OrderedStore<T>>) -> Self {
        Self::with_options(store, MoveOptions::default())
    }

    pub fn with_options(store: Arc<dyn OrderedStore<T>>, options: MoveOptions) -> Self {
        Self {
            store,
            locks: ParentLocks::new(),
            options,
        }
    }

    pub fn options(&self) -> &MoveOptions {
        &self.options
    }

    /// Children of `parent` in position order
    pub async fn list(&self, parent: &Id) -> Result<Vec<T>> {
        self.store.list_by_parent(parent).await
    }

    pub async fn get(&self, id: &Id) -> Result<T> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| BoardkeepError::not_found(T::KIND, id))
    }

    /// Add `item` to its parent, appended unless a position is given
    pub async fn insert(&self, item: T, position: Option<i64>) -> Result<T> {
        let target = match position {
            Some(position) => self.resolve_position(position)?,
            None => usize::MAX,
        };
        let parent = item.parent_id().clone();
        let id = item.id().clone();

        let _guard = self.locks.lock(&parent).await;
        let scope = self.store.begin().await?;
        if !self.store.parent_exists(&parent).await? {
            return Err(BoardkeepError::not_found(T::PARENT_KIND, &parent));
        }

        let mut siblings = self.store.list_by_parent(&parent).await?;
        if T::UNIQUE_NAMES && siblings.iter().any(|s| s.name() == item.name()) {
            return Err(BoardkeepError::duplicate_name(T::KIND, item.name()));
        }

        insert_clamped(&mut siblings, item, target);
        let ordered = self.apply(reindex(siblings), Some(&id), &scope).await?;
        debug!(kind = T::KIND, %id, %parent, "inserted");
        find(ordered, &id)
    }

    /// Move an item to `position` within its current parent.
    ///
    /// Returns the parent's children in their new order.
    pub async fn reorder(&self, id: &Id, parent: &Id, position: i64) -> Result<Vec<T>> {
        let target = self.resolve_position(position)?;
        let (item, _guard, scope) = self.lock_item(id, None).await?;
        if item.parent_id() != parent {
            return Err(BoardkeepError::invalid_parent(T::KIND, id, parent));
        }

        let ordered = self.reorder_locked(item, target, &scope).await?;
        info!(kind = T::KIND, %id, %parent, position = target.min(ordered.len() - 1), "reordered");
        Ok(ordered)
    }

    /// Move an item to `position` within whichever parent holds it once the
    /// lock is taken. Returns that parent's children in their new order.
    pub async fn reposition(&self, id: &Id, position: i64) -> Result<Vec<T>> {
        let target = self.resolve_position(position)?;
        let (item, _guard, scope) = self.lock_item(id, None).await?;
        let parent = item.parent_id().clone();

        let ordered = self.reorder_locked(item, target, &scope).await?;
        info!(kind = T::KIND, %id, %parent, position = target.min(ordered.len() - 1), "reordered");
        Ok(ordered)
    }

    /// Move an item under `new_parent` at `position`, closing the gap it
    /// leaves behind. Both sibling lists are committed together.
    pub async fn reparent(&self, id: &Id, new_parent: &Id, position: i64) -> Result<T> {
        let target = self.resolve_position(position)?;
        let (mut item, _guard, scope) = self.lock_item(id, Some(new_parent)).await?;

        if !self.store.parent_exists(new_parent).await? {
            return Err(BoardkeepError::invalid_parent(T::KIND, id, new_parent));
        }

        let old_parent = item.parent_id().clone();
        if &old_parent == new_parent {
            let ordered = self.reorder_locked(item, target, &scope).await?;
            return find(ordered, id);
        }

        let mut destination = self.store.list_by_parent(new_parent).await?;
        destination.retain(|s| s.id() != id);
        if T::UNIQUE_NAMES && destination.iter().any(|s| s.name() == item.name()) {
            return Err(BoardkeepError::duplicate_name(T::KIND, item.name()));
        }

        let mut remaining = self.store.list_by_parent(&old_parent).await?;
        remaining.retain(|s| s.id() != id);

        item.set_parent_id(new_parent.clone());
        item.touch();
        insert_clamped(&mut destination, item, target);

        let mut changes = ChangeSet::new();
        let ordered = self.stage(reindex(destination), Some(id), &mut changes);
        self.stage(reindex(remaining), None, &mut changes);
        debug!(kind = T::KIND, %id, writes = changes.len(), "committing reparent");
        self.store.commit(changes, &scope).await?;

        let moved = find(ordered, id)?;
        info!(
            kind = T::KIND,
            %id,
            from = %old_parent,
            to = %new_parent,
            position = moved.position(),
            "reparented"
        );
        Ok(moved)
    }

    /// Remove an item and reindex the siblings it leaves behind
    pub async fn delete_and_reindex(&self, id: &Id) -> Result<T> {
        let (item, _guard, scope) = self.lock_item(id, None).await?;

        let mut remaining = self.store.list_by_parent(item.parent_id()).await?;
        remaining.retain(|s| s.id() != id);

        let mut changes = ChangeSet::new();
        changes.delete(id.clone());
        self.stage(reindex(remaining), None, &mut changes);
        self.store.commit(changes, &scope).await?;

        info!(kind = T::KIND, %id, parent = %item.parent_id(), "deleted");
        Ok(item)
    }

    /// Apply `edit` to an item under its parent lock.
    ///
    /// The parent and position are not editable here; name uniqueness is
    /// checked against the siblings, excluding the item itself.
    pub async fn update<F>(&self, id: &Id, edit: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()> + Send,
    {
        let (mut item, _guard, scope) = self.lock_item(id, None).await?;
        let parent = item.parent_id().clone();
        let position = item.position();
        let name = item.name().to_string();

        edit(&mut item)?;
        item.set_parent_id(parent.clone());
        item.set_position(position);

        // A sibling holding the new name is necessarily another item
        if T::UNIQUE_NAMES
            && item.name() != name
            && self
                .store
                .exists_by_parent_and_name(&parent, item.name())
                .await?
        {
            return Err(BoardkeepError::duplicate_name(T::KIND, item.name()));
        }

        item.touch();
        let mut changes = ChangeSet::new();
        changes.save(item.clone());
        self.store.commit(changes, &scope).await?;
        Ok(item)
    }

    /// Lock `parent` without touching its children. Nothing can be inserted
    /// into or moved under it while the guard lives.
    pub async fn lock_parent(&self, parent: &Id) -> ParentGuard {
        self.locks.lock(parent).await
    }

    /// Delete every child of a parent already locked with [`Self::lock_parent`]
    pub async fn clear_locked(&self, parent: &Id, guard: &ParentGuard) -> Result<Vec<T>> {
        debug_assert!(guard.covers(parent), "{} is not locked", parent);
        let scope = self.store.begin().await?;
        let children = self.store.list_by_parent(parent).await?;
        if children.is_empty() {
            return Ok(children);
        }

        let mut changes = ChangeSet::new();
        for child in &children {
            changes.delete(child.id().clone());
        }
        self.store.commit(changes, &scope).await?;

        debug!(kind = T::KIND, %parent, removed = children.len(), "cleared parent");
        Ok(children)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn resolve_position(&self, position: i64) -> Result<usize> {
        if position >= 0 {
            return Ok(usize::try_from(position).unwrap_or(usize::MAX));
        }
        if self.options.strict_positions {
            return Err(BoardkeepError::validation(
                "position",
                format!("must not be negative, got {}", position),
            ));
        }
        debug!(position, "clamping negative position to 0");
        Ok(0)
    }

    /// Load an item, lock its parent (and `also`, when given) and open a
    /// store sequence.
    ///
    /// The item is re-read inside the sequence. If a concurrent reparent, in
    /// this process or another, moved it in the meantime, everything is
    /// released and the attempt repeated.
    async fn lock_item(&self, id: &Id, also: Option<&Id>) -> Result<(T, ParentGuard, StoreGuard)> {
        let attempts = self.options.max_move_attempts.max(1);
        for attempt in 1..=attempts {
            let seen = self.get(id).await?;
            let parent = seen.parent_id().clone();
            let guard = self
                .locks
                .lock_pair(&parent, also.unwrap_or(&parent))
                .await;
            let scope = self.store.begin().await?;

            let current = self.get(id).await?;
            if current.parent_id() == &parent {
                return Ok((current, guard, scope));
            }
            warn!(
                kind = T::KIND,
                %id,
                attempt,
                "{} moved while waiting for its parent lock, retrying",
                T::KIND
            );
        }
        Err(BoardkeepError::Conflict {
            id: id.to_string(),
            attempts,
        })
    }

    async fn reorder_locked(&self, item: T, target: usize, scope: &StoreGuard) -> Result<Vec<T>> {
        let id = item.id().clone();
        let mut siblings = self.store.list_by_parent(item.parent_id()).await?;
        siblings.retain(|s| s.id() != &id);
        insert_clamped(&mut siblings, item, target);
        self.apply(reindex(siblings), None, scope).await
    }

    async fn apply(
        &self,
        placements: Vec<Placement<T>>,
        force: Option<&Id>,
        scope: &StoreGuard,
    ) -> Result<Vec<T>> {
        let mut changes = ChangeSet::new();
        let ordered = self.stage(placements, force, &mut changes);
        debug!(kind = T::KIND, writes = changes.len(), "committing reindex");
        self.store.commit(changes, scope).await?;
        Ok(ordered)
    }

    /// Queue the writes of one reindexed sibling list. `force` is saved even
    /// when its position is unchanged (new or reparented items).
    fn stage(
        &self,
        placements: Vec<Placement<T>>,
        force: Option<&Id>,
        changes: &mut ChangeSet<T>,
    ) -> Vec<T> {
        let mut ordered = Vec::with_capacity(placements.len());
        for placement in placements {
            let forced = force == Some(placement.item.id());
            let changed = placement.changed();
            let mut item = placement.item;
            if changed && !forced {
                item.touch();
            }
            if forced || changed || self.options.rewrite_unchanged {
                changes.save(item.clone());
            }
            ordered.push(item);
        }
        ordered
    }
}

fn find<T: Positioned>(items: Vec<T>, id: &Id) -> Result<T> {
    items
        .into_iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| BoardkeepError::not_found(T::KIND, id))
}
