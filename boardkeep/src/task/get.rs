//! GetTask command

use super::to_value;
use crate::context::BoardContext;
use crate::error::BoardkeepError;
use crate::types::TaskId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a task by ID
#[operation(verb = "get", noun = "task", description = "Retrieve a task by ID")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetTask {
    pub id: TaskId,
}

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for GetTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        match ctx.tasks().get(&self.id).await {
            Ok(task) => ExecutionResult::read(to_value(&task)),
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
