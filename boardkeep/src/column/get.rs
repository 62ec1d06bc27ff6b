//! GetColumn command

use crate::context::BoardContext;
use crate::error::BoardkeepError;
use crate::types::ColumnId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a column by ID
#[operation(verb = "get", noun = "column", description = "Retrieve a column by ID")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetColumn {
    pub id: ColumnId,
}

impl GetColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for GetColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        ExecutionResult::read(
            async {
                let column = ctx.columns().get(&self.id).await?;
                let task_count = ctx.tasks().list(&column.id).await?.len();

                let mut value = serde_json::to_value(&column)?;
                value["task_count"] = task_count.into();
                Ok::<_, BoardkeepError>(value)
            }
            .await,
        )
    }
}
