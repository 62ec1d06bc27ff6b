//! Audit entries written for every mutating operation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed operation, as stored in the activity log (one JSON line each)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID, so entries also sort by creation time
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string ("reorder column", "move task")
    pub op: String,

    /// The command as submitted
    pub input: Value,

    /// The returned value, or `{"error": ...}`
    pub output: Value,

    /// Who ran it: "user_id" or "agent_name[session_id]"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Attribute the entry to an actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Whether the recorded operation failed
    pub fn is_error(&self) -> bool {
        self.output.get("error").is_some()
    }
}
