//! DeleteColumn command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::ColumnId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Delete a column and its tasks; the remaining columns are reindexed
#[operation(
    verb = "delete",
    noun = "column",
    description = "Delete a column and its tasks"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    pub id: ColumnId,
}

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for DeleteColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let column = ctx.columns().get(&self.id).await?;

            // Tasks go first so a failure never leaves them under a missing column
            let guard = ctx.tasks().lock_parent(&column.id).await;
            let mut tasks = ctx.tasks().clear_locked(&column.id, &guard).await?;
            let column = ctx.columns().delete_and_reindex(&column.id).await?;

            // Another process may have added tasks before the column was gone
            match ctx.tasks().clear_locked(&column.id, &guard).await {
                Ok(late) => tasks.extend(late),
                Err(e) => warn!(column = %column.id, "failed to sweep late tasks: {}", e),
            }

            Ok(serde_json::json!({
                "deleted": true,
                "id": column.id,
                "tasks_deleted": tasks.len(),
            }))
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
