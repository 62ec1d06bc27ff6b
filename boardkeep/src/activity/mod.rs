//! Activity log commands

mod list;

pub use list::ListActivity;
