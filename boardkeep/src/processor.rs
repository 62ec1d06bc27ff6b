//! BoardkeepProcessor - runs commands and records them in the activity log

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use boardkeep_operations::{async_trait, Execute, OperationProcessor};
use serde_json::Value;
use tracing::{debug, warn};

/// Executes commands against a [`BoardContext`], stamping every logged entry
/// with the configured actor before appending it to the activity log.
#[derive(Debug, Clone, Default)]
pub struct BoardkeepProcessor {
    actor: Option<String>,
}

impl BoardkeepProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute entries to `actor` ("user_id" or "agent_name[session_id]")
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardkeepError> for BoardkeepProcessor {
    async fn process<O>(&self, operation: &O, ctx: &BoardContext) -> Result<Value>
    where
        O: Execute<BoardContext, BoardkeepError>,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.as_str());
            }
            debug!(op = %entry.op, duration_ms = entry.duration_ms, "recording activity");
            // The command already ran; a failed append must not change its outcome
            if let Err(e) = ctx.activity().append(&entry).await {
                warn!(op = %entry.op, "failed to append activity entry: {}", e);
            }
        }

        result
    }
}
