//! Task: a positioned child of a column

use super::id::{ColumnId, Id, TaskId};
use super::positioned::Positioned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!(
                "unknown priority '{}', expected low, medium, high or urgent",
                other
            )),
        }
    }
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub position: usize,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub const DEFAULT_COLOR: &'static str = "#ffffff";

    /// A new task; its position is assigned when it is inserted
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            column_id: column_id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            color: Self::DEFAULT_COLOR.to_string(),
            due_date: None,
            position: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Whether the due date falls inside `[start, end]`
    pub fn is_due_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due >= start && due <= end)
    }
}

impl Positioned for Task {
    const KIND: &'static str = "task";
    const PARENT_KIND: &'static str = "column";
    const UNIQUE_NAMES: bool = false;

    fn id(&self) -> &Id {
        &self.id
    }

    fn parent_id(&self) -> &Id {
        &self.column_id
    }

    fn set_parent_id(&mut self, parent: Id) {
        self.column_id = parent;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
