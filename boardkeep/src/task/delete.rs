//! DeleteTask command

use super::to_value;
use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::TaskId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delete a task; the tasks below it move up
#[operation(verb = "delete", noun = "task", description = "Delete a task")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for DeleteTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let task = ctx.tasks().delete_and_reindex(&self.id).await?;
            let mut value = to_value(&task)?;
            value["deleted"] = true.into();
            Ok(value)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
