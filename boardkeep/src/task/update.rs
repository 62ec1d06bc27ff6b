//! UpdateTask command

use super::{to_value, validate_fields};
use crate::context::BoardContext;
use crate::error::{BoardkeepError, Result};
use crate::types::{Priority, TaskId};
use boardkeep_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Edit a task's fields; its column and position are changed with MoveTask
#[operation(verb = "update", noun = "task", description = "Update task fields")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateTask {
    /// The task to update
    pub id: TaskId,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New color
    pub color: Option<String>,
    /// New due date
    pub due_date: Option<DateTime<Utc>>,
    /// Remove the due date
    #[serde(default)]
    pub clear_due_date: bool,
}

impl UpdateTask {
    /// Create a new UpdateTask command that changes nothing yet
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the new title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the new priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the new color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the new due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Remove the due date
    pub fn without_due_date(mut self) -> Self {
        self.clear_due_date = true;
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardkeepError> for UpdateTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            validate_fields(
                self.title.as_deref(),
                self.description.as_deref(),
                self.color.as_deref(),
            )?;

            let task = ctx
                .tasks()
                .update(&self.id, |task| {
                    if let Some(title) = &self.title {
                        task.title = title.clone();
                    }
                    if let Some(description) = &self.description {
                        task.description = description.clone();
                    }
                    if let Some(priority) = self.priority {
                        task.priority = priority;
                    }
                    if let Some(color) = &self.color {
                        task.color = color.clone();
                    }
                    if self.clear_due_date {
                        task.due_date = None;
                    } else if self.due_date.is_some() {
                        task.due_date = self.due_date;
                    }
                    Ok(())
                })
                .await?;
            to_value(&task)
        }
        .await;

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }
}
