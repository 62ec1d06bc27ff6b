//! Board: the root of the hierarchy

use super::id::BoardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board owns columns. It has no position of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
