//! Column: a positioned child of a board

use super::id::{BoardId, ColumnId, Id};
use super::positioned::Positioned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workflow stage on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    pub color: String,
    pub position: usize,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Column {
    pub const DEFAULT_COLOR: &'static str = "#3498db";

    /// A new column; its position is assigned when it is inserted
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            board_id: board_id.into(),
            name: name.into(),
            color: Self::DEFAULT_COLOR.to_string(),
            position: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

impl Positioned for Column {
    const KIND: &'static str = "column";
    const PARENT_KIND: &'static str = "board";
    const UNIQUE_NAMES: bool = true;

    fn id(&self) -> &Id {
        &self.id
    }

    fn parent_id(&self) -> &Id {
        &self.board_id
    }

    fn set_parent_id(&mut self, parent: Id) {
        self.board_id = parent;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
