//! DeleteBoard command

use crate::context::BoardContext;
use crate::engine::ParentGuard;
use crate::error::{BoardkeepError, Result};
use crate::types::BoardId;
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Delete a board together with its columns and their tasks
#[operation(
    verb = "delete",
    noun = "board",
    description = "Delete a board and everything on it"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBoard {
    pub id: BoardId,
}

impl DeleteBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for DeleteBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let _writes = ctx.lock_boards().await;
            let board = ctx.read_board(&self.id).await?;

            // Children go before their parents, so a failed step never strands
            // a task under a missing column or a column under a missing board.
            // Task locks are always taken before the board's column lock.
            let mut cleared: Vec<ParentGuard> = Vec::new();
            let mut tasks_deleted = 0;
            let (columns, _board_guard) = loop {
                for column in ctx.columns().list(&board.id).await? {
                    if cleared.iter().any(|guard| guard.covers(&column.id)) {
                        continue;
                    }
                    let guard = ctx.tasks().lock_parent(&column.id).await;
                    tasks_deleted += ctx.tasks().clear_locked(&column.id, &guard).await?.len();
                    cleared.push(guard);
                }

                let board_guard = ctx.columns().lock_parent(&board.id).await;
                let current = ctx.columns().list(&board.id).await?;
                if current
                    .iter()
                    .all(|column| cleared.iter().any(|guard| guard.covers(&column.id)))
                {
                    let columns = ctx.columns().clear_locked(&board.id, &board_guard).await?;
                    break (columns, board_guard);
                }
                debug!(board = %board.id, "column added during delete, clearing again");
            };
            ctx.boards().delete_board(&board.id).await?;

            info!(board = %board.id, columns = columns.len(), tasks = tasks_deleted, "deleted board");
            Ok(serde_json::json!({
                "deleted": true,
                "id": board.id,
                "columns_deleted": columns.len(),
                "tasks_deleted": tasks_deleted,
            }))
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, GetBoard};
    use crate::config::BoardkeepConfig;
    use crate::store::testing::ScriptedStore;
    use crate::store::{BoardStore, OrderedStore};
    use crate::task::{AddTask, GetTask};
    use crate::types::{Column, ColumnId, Task, TaskId};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let ctx = BoardContext::in_memory();
        let board = CreateBoard::new("Doomed")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board_id = board["id"].as_str().unwrap();
        let todo = board["columns"][0]["id"].as_str().unwrap();
        let task = AddTask::new(todo, "Gone soon")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = DeleteBoard::new(board_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["deleted"], true);
        assert_eq!(result["columns_deleted"], 3);
        assert_eq!(result["tasks_deleted"], 1);

        let board = GetBoard::new(board_id).execute(&ctx).await.into_result();
        assert!(matches!(board, Err(BoardkeepError::NotFound { .. })));
        let task = GetTask::new(task["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(task, Err(BoardkeepError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_failed_cascade_strands_nothing() {
        for failing in ["task", "column"] {
            let store = Arc::new(ScriptedStore::new());
            let ctx = BoardContext::new(store.clone(), BoardkeepConfig::default());
            let board = CreateBoard::new("Doomed")
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            let board_id = board["id"].as_str().unwrap();
            let mut column_ids = Vec::new();
            let mut task_ids = Vec::new();
            for column in board["columns"].as_array().unwrap() {
                let column_id = column["id"].as_str().unwrap();
                let task = AddTask::new(column_id, "Keep me reachable")
                    .execute(&ctx)
                    .await
                    .into_result()
                    .unwrap();
                column_ids.push(ColumnId::from_string(column_id));
                task_ids.push(TaskId::from_string(task["id"].as_str().unwrap()));
            }

            store.fail_commits(failing);
            let result = DeleteBoard::new(board_id).execute(&ctx).await.into_result();
            assert!(result.is_err(), "{} commit failure must surface", failing);

            for id in &task_ids {
                if let Some(task) = OrderedStore::<Task>::get(store.as_ref(), id).await.unwrap() {
                    let column = OrderedStore::<Column>::get(store.as_ref(), &task.column_id)
                        .await
                        .unwrap();
                    assert!(column.is_some(), "task orphaned when {} commits fail", failing);
                }
            }
            for id in &column_ids {
                if let Some(column) = OrderedStore::<Column>::get(store.as_ref(), id).await.unwrap() {
                    let board = store.get_board(&column.board_id).await.unwrap();
                    assert!(board.is_some(), "column orphaned when {} commits fail", failing);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_delete_missing_board() {
        let ctx = BoardContext::in_memory();
        let result = DeleteBoard::new("nope").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(BoardkeepError::NotFound { .. })));
    }
}
