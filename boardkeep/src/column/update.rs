//! UpdateColumn command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::ColumnId;
use crate::validate;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rename or recolor a column
#[operation(verb = "update", noun = "column", description = "Update column name or color")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    pub id: ColumnId,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl UpdateColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for UpdateColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            if let Some(name) = &self.name {
                validate::required_text("name", name, validate::MAX_NAME_LEN)?;
            }
            if let Some(color) = &self.color {
                validate::color(color)?;
            }

            let column = ctx
                .columns()
                .update(&self.id, |column| {
                    if let Some(name) = &self.name {
                        column.name = name.clone();
                    }
                    if let Some(color) = &self.color {
                        column.color = color.clone();
                    }
                    Ok(())
                })
                .await?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;

    async fn setup() -> (BoardContext, Value) {
        let ctx = BoardContext::in_memory();
        let board = CreateBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (ctx, board)
    }

    #[tokio::test]
    async fn test_update_column() {
        let (ctx, board) = setup().await;
        let done = board["columns"][2]["id"].as_str().unwrap();

        let result = UpdateColumn::new(done)
            .with_name("Shipped")
            .with_color("#000000")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Shipped");
        assert_eq!(result["color"], "#000000");
        assert_eq!(result["position"], 2);
    }

    #[tokio::test]
    async fn test_update_column_keeps_own_name() {
        let (ctx, board) = setup().await;
        let done = board["columns"][2]["id"].as_str().unwrap();

        UpdateColumn::new(done)
            .with_name("Done")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_column_duplicate_name() {
        let (ctx, board) = setup().await;
        let done = board["columns"][2]["id"].as_str().unwrap();

        let result = UpdateColumn::new(done)
            .with_name("To Do")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardkeepError::DuplicateName { .. })));
    }
}
