//! ListTasks command

use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{BoardId, ColumnId, Priority, Task};
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List the tasks of one column, or of a whole board column by column
#[operation(
    verb = "list",
    noun = "tasks",
    description = "List tasks of a column or board, optionally filtered"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListTasks {
    /// List one column in position order
    pub column: Option<ColumnId>,
    /// List every column of a board, column by column
    pub board: Option<BoardId>,
    /// Only tasks with this priority
    pub priority: Option<Priority>,
    /// Only tasks due at or after this instant
    pub due_after: Option<DateTime<Utc>>,
    /// Only tasks due at or before this instant
    pub due_before: Option<DateTime<Utc>>,
}

impl ListTasks {
    /// Tasks of one column
    pub fn in_column(column: impl Into<ColumnId>) -> Self {
        Self {
            column: Some(column.into()),
            ..Default::default()
        }
    }

    /// Tasks of every column on a board
    pub fn for_board(board: impl Into<BoardId>) -> Self {
        Self {
            board: Some(board.into()),
            ..Default::default()
        }
    }

    /// Filter by priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Filter to tasks due within `start..=end`
    pub fn due_between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.due_after = Some(start);
        self.due_before = Some(end);
        self
    }

    fn matches(&self, task: &Task) -> bool {
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if self.due_after.is_none() && self.due_before.is_none() {
            return true;
        }
        task.is_due_between(
            self.due_after.unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.due_before.unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    async fn collect(&self, ctx: &BoardContext) -> Result<Vec<Task>> {
        match (&self.column, &self.board) {
            (Some(column), None) => {
                ctx.columns().get(column).await?;
                ctx.tasks().list(column).await
            }
            (None, Some(board)) => {
                ctx.read_board(board).await?;
                let mut tasks = Vec::new();
                for column in ctx.columns().list(board).await? {
                    tasks.extend(ctx.tasks().list(&column.id).await?);
                }
                Ok(tasks)
            }
            _ => Err(BoardkeepError::validation(
                "column",
                "exactly one of column or board is required",
            )),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        match self.collect(ctx).await {
            Ok(tasks) => {
                let tasks: Vec<Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();
                ExecutionResult::Unlogged {
                    value: serde_json::json!({
                        "tasks": tasks,
                        "count": tasks.len()
                    }),
                }
            }
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
