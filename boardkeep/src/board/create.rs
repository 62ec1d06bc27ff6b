//! CreateBoard command

use crate::context::BoardContext;
use crate::defaults::DEFAULT_COLUMNS;
use crate::error::{BoardkeepError, Result};
use crate::types::{Board, Column};
use crate::validate;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Create a board seeded with the default columns
#[operation(
    verb = "create",
    noun = "board",
    description = "Create a board with To Do, In Progress and Done columns"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// Unique board name
    pub name: String,
    pub description: Option<String>,
}

impl CreateBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for CreateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            validate::required_text("name", &self.name, validate::MAX_NAME_LEN)?;
            if let Some(description) = &self.description {
                validate::max_len(
                    "description",
                    description,
                    validate::MAX_BOARD_DESCRIPTION_LEN,
                )?;
            }

            let _writes = ctx.lock_boards().await;
            if ctx.boards().board_name_exists(&self.name).await? {
                return Err(BoardkeepError::duplicate_name("board", &self.name));
            }

            let mut board = Board::new(&self.name);
            board.description = self.description.clone();
            ctx.boards().save_board(&board).await?;

            let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
            for (name, color) in DEFAULT_COLUMNS {
                let column = Column::new(&board.id, name).with_color(color);
                columns.push(ctx.columns().insert(column, None).await?);
            }

            let mut value = serde_json::to_value(&board)?;
            value["columns"] = serde_json::to_value(&columns)?;
            Ok(value)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_board_seeds_default_columns() {
        let ctx = BoardContext::in_memory();

        let result = CreateBoard::new("Roadmap")
            .with_description("Q3")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Roadmap");
        assert_eq!(result["description"], "Q3");
        let columns = result["columns"].as_array().unwrap();
        let seeded: Vec<(&str, &str, u64)> = columns
            .iter()
            .map(|c| {
                (
                    c["name"].as_str().unwrap(),
                    c["color"].as_str().unwrap(),
                    c["position"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            seeded,
            vec![
                ("To Do", "#e74c3c", 0),
                ("In Progress", "#f39c12", 1),
                ("Done", "#27ae60", 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_create_board_duplicate_name() {
        let ctx = BoardContext::in_memory();
        CreateBoard::new("Roadmap").execute(&ctx).await.into_result().unwrap();

        let result = CreateBoard::new("Roadmap").execute(&ctx).await;
        assert!(result.should_log());
        assert!(matches!(
            result.into_result(),
            Err(BoardkeepError::DuplicateName { .. })
        ));

        // Case-sensitive
        CreateBoard::new("roadmap").execute(&ctx).await.into_result().unwrap();
    }

    #[tokio::test]
    async fn test_create_board_validates_name() {
        let ctx = BoardContext::in_memory();
        let result = CreateBoard::new("  ").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(BoardkeepError::Validation { .. })));

        let result = CreateBoard::new("x")
            .with_description("d".repeat(501))
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardkeepError::Validation { .. })));
    }
}
