//! Columns every new board starts with

/// (name, color) of the default columns, in position order
pub const DEFAULT_COLUMNS: [(&str, &str); 3] = [
    ("To Do", "#e74c3c"),
    ("In Progress", "#f39c12"),
    ("Done", "#27ae60"),
];
