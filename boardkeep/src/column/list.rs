//! ListColumns command

use crate::context::BoardContext;
use crate::error::BoardkeepError;
use crate::types::BoardId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List the columns of a board
#[operation(
    verb = "list",
    noun = "columns",
    description = "List the columns of a board ordered by position"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListColumns {
    pub board: BoardId,
}

impl ListColumns {
    pub fn new(board: impl Into<BoardId>) -> Self {
        Self {
            board: board.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for ListColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        match async {
            let board = ctx.read_board(&self.board).await?;
            let columns = ctx.columns().list(&board.id).await?;

            Ok(serde_json::json!({
                "columns": columns,
                "count": columns.len()
            }))
        }
        .await
        {
            Ok(value) => ExecutionResult::Unlogged { value },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
