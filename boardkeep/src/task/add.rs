//! AddTask command

use super::{to_value, validate_fields};
use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{ColumnId, Priority, Task};
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Create a task in a column
#[operation(verb = "add", noun = "task", description = "Create a new task in a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    /// The column to add the task to (required)
    pub column: ColumnId,
    /// The task title (required)
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Defaults to medium
    pub priority: Option<Priority>,
    /// `#rrggbb`, defaults to white
    pub color: Option<String>,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// Slot to insert at; appended when absent
    pub position: Option<i64>,
}

impl AddTask {
    /// Create a new AddTask command
    pub fn new(column: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            title: title.into(),
            description: None,
            priority: None,
            color: None,
            due_date: None,
            position: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Insert at this slot instead of appending
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            validate_fields(
                Some(self.title.as_str()),
                self.description.as_deref(),
                self.color.as_deref(),
            )?;

            let mut task = Task::new(&self.column, &self.title);
            if let Some(description) = &self.description {
                task.description = description.clone();
            }
            if let Some(priority) = self.priority {
                task.priority = priority;
            }
            if let Some(color) = &self.color {
                task.color = color.clone();
            }
            task.due_date = self.due_date;

            let task = ctx.tasks().insert(task, self.position).await?;
            to_value(&task)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
