//! Reindexing: assign contiguous zero-based positions to an ordered sequence
//!
//! Pure functions, no I/O. The caller arranges the sequence in its final order
//! (for a move, by inserting the item at its target slot first) and the
//! reindexer stamps position `i` on the item at index `i`.

use crate::types::Positioned;

/// An item after reindexing, with the position it carried before
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    pub item: T,
    pub previous: usize,
}

impl<T: Positioned> Placement<T> {
    pub fn position(&self) -> usize {
        self.item.position()
    }

    /// Whether the stored position has to be rewritten
    pub fn changed(&self) -> bool {
        self.previous != self.item.position()
    }
}

/// Assign position `i` to the item at index `i`.
///
/// Idempotent: reindexing an already contiguous sequence changes nothing.
pub fn reindex<T: Positioned>(items: Vec<T>) -> Vec<Placement<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, mut item)| {
            let previous = item.position();
            item.set_position(index);
            Placement { item, previous }
        })
        .collect()
}

/// Insert `item` at `index`, or append when `index` is past the end
pub fn insert_clamped<T>(items: &mut Vec<T>, item: T, index: usize) {
    if index >= items.len() {
        items.push(item);
    } else {
        items.insert(index, item);
    }
}

/// Whether `items` hold exactly the positions `0..len` in order
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index)
}
