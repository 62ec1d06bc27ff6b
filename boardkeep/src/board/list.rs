//! ListBoards command

use crate::context::BoardContext;
use crate::error::BoardkeepError;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List all boards
#[operation(verb = "list", noun = "boards", description = "List all boards, newest first")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListBoards;

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for ListBoards {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        match ctx.boards().list_boards().await {
            Ok(boards) => ExecutionResult::Unlogged {
                value: serde_json::json!({
                    "boards": boards,
                    "count": boards.len()
                }),
            },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
