//! The positional contract shared by columns and tasks

use super::id::Id;

/// An item with an identity, a parent and a zero-based position among its siblings.
///
/// Siblings of one parent always hold positions `0..count`. The move engine is
/// written once against this trait.
pub trait Positioned: Clone + Send + Sync + 'static {
    /// Noun used in errors and logs ("column", "task")
    const KIND: &'static str;

    /// Noun of the parent ("board", "column")
    const PARENT_KIND: &'static str;

    /// Whether `name()` must be unique among siblings
    const UNIQUE_NAMES: bool;

    fn id(&self) -> &Id;

    fn parent_id(&self) -> &Id;

    fn set_parent_id(&mut self, parent: Id);

    fn position(&self) -> usize;

    fn set_position(&mut self, position: usize);

    /// Display name (column name, task title)
    fn name(&self) -> &str;

    /// Record a modification time
    fn touch(&mut self);
}
