//! AddColumn command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{BoardId, Column};
use crate::validate;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a new column to a board
#[operation(verb = "add", noun = "column", description = "Add a new column to a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    pub board: BoardId,
    /// Unique within the board
    pub name: String,
    pub color: Option<String>,
    /// Slot to insert at; appended when absent or past the end
    pub position: Option<i64>,
}

impl AddColumn {
    pub fn new(board: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            name: name.into(),
            color: None,
            position: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for AddColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            validate::required_text("name", &self.name, validate::MAX_NAME_LEN)?;
            let mut column = Column::new(&self.board, &self.name);
            if let Some(color) = &self.color {
                validate::color(color)?;
                column.color = color.clone();
            }

            let column = ctx.columns().insert(column, self.position).await?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
