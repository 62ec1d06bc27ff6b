//! GetBoard command

use crate::context::BoardContext;
use crate::error::BoardkeepError;
use crate::types::BoardId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a board with its columns and their tasks, all in position order
#[operation(
    verb = "get",
    noun = "board",
    description = "Retrieve a board with nested columns and tasks"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    pub id: BoardId,
}

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for GetBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        ExecutionResult::read(
            async {
                let board = ctx.read_board(&self.id).await?;

                let mut columns = Vec::new();
                let mut task_count = 0;
                for column in ctx.columns().list(&board.id).await? {
                    let tasks = ctx.tasks().list(&column.id).await?;
                    task_count += tasks.len();

                    let mut value = serde_json::to_value(&column)?;
                    value["task_count"] = tasks.len().into();
                    value["tasks"] = serde_json::to_value(&tasks)?;
                    columns.push(value);
                }

                let mut result = serde_json::to_value(&board)?;
                result["columns"] = Value::Array(columns);
                result["task_count"] = task_count.into();
                Ok::<_, BoardkeepError>(result)
            }
            .await,
        )
    }
}
