//! UpdateBoard command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::BoardId;
use crate::validate;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rename a board or change its description
#[operation(verb = "update", noun = "board", description = "Update board name or description")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    pub id: BoardId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for UpdateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let _writes = ctx.lock_boards().await;
            let mut board = ctx.read_board(&self.id).await?;

            if let Some(name) = &self.name {
                validate::required_text("name", name, validate::MAX_NAME_LEN)?;
                if name != &board.name && ctx.boards().board_name_exists(name).await? {
                    return Err(BoardkeepError::duplicate_name("board", name));
                }
                board.name = name.clone();
            }
            if let Some(description) = &self.description {
                validate::max_len(
                    "description",
                    description,
                    validate::MAX_BOARD_DESCRIPTION_LEN,
                )?;
                board.description = Some(description.clone());
            }

            board.touch();
            let board = ctx.boards().save_board(&board).await?;
            Ok(serde_json::to_value(&board)?)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
