//! MoveTask command

use super::to_value;
use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{ColumnId, TaskId};
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move a task within its column, or into another column
#[operation(
    verb = "move",
    noun = "task",
    description = "Move a task to a new position, optionally in a different column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    pub id: TaskId,
    /// Target column; the task stays in its own column when absent
    pub column: Option<ColumnId>,
    /// Zero-based target slot; past the end appends
    pub position: i64,
}

impl MoveTask {
    /// Reorder within the current column
    pub fn new(id: impl Into<TaskId>, position: i64) -> Self {
        Self {
            id: id.into(),
            column: None,
            position,
        }
    }

    /// Move into `column` at `position`
    pub fn to_column(id: impl Into<TaskId>, column: impl Into<ColumnId>, position: i64) -> Self {
        Self {
            id: id.into(),
            column: Some(column.into()),
            position,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let task = match &self.column {
                Some(column) => ctx.tasks().reparent(&self.id, column, self.position).await?,
                None => ctx
                    .tasks()
                    .reposition(&self.id, self.position)
                    .await?
                    .into_iter()
                    .find(|t| t.id == self.id)
                    .ok_or_else(|| BoardkeepError::not_found("task", &self.id))?,
            };
            to_value(&task)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
