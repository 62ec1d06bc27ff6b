//! Core types for boardkeep

mod board;
mod column;
mod id;
mod positioned;
mod task;

pub use board::Board;
pub use column::Column;
pub use id::{BoardId, ColumnId, Id, TaskId};
pub use positioned::Positioned;
pub use task::{Priority, Task};
