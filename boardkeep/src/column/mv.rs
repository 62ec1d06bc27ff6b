//! MoveColumn command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{BoardId, ColumnId};
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reorder a column within its board
#[operation(
    verb = "move",
    noun = "column",
    description = "Move a column to a new position on its board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveColumn {
    pub id: ColumnId,
    /// Zero-based target slot; past the end appends
    pub position: i64,
    /// Expected board; defaults to the column's own
    pub board: Option<BoardId>,
}

impl MoveColumn {
    /// Reorder within the column's own board
    pub fn new(id: impl Into<ColumnId>, position: i64) -> Self {
        Self {
            id: id.into(),
            position,
            board: None,
        }
    }

    /// Fail with an invalid parent error unless the column is on `board`
    pub fn on_board(mut self, board: impl Into<BoardId>) -> Self {
        self.board = Some(board.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for MoveColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let columns = match &self.board {
                Some(board) => ctx.columns().reorder(&self.id, board, self.position).await?,
                None => ctx.columns().reposition(&self.id, self.position).await?,
            };
            let moved = columns.iter().find(|c| c.id == self.id);

            Ok(serde_json::json!({
                "column": moved,
                "columns": columns,
            }))
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
