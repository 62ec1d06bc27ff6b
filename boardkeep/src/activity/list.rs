//! ListActivity command

use crate::context::BoardContext;
use crate::error::BoardkeepError;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read the activity log, newest entry first
#[operation(
    verb = "list",
    noun = "activity",
    description = "List recorded operations, newest first"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListActivity {
    pub limit: Option<usize>,
}

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for ListActivity {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        match ctx.activity().read(self.limit).await {
            Ok(entries) => ExecutionResult::Unlogged {
                value: serde_json::json!({
                    "entries": entries,
                    "count": entries.len()
                }),
            },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
