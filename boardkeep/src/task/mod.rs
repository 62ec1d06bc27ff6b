//! Task commands

mod add;
mod delete;
mod get;
mod list;
mod mv;
mod update;

pub use add::AddTask;
pub use delete::DeleteTask;
pub use get::GetTask;
pub use list::ListTasks;
pub use mv::MoveTask;
pub use update::UpdateTask;

use crate::error::Result;
use crate::types::Task;
use crate::validate;

/// Checks shared by add and update
fn validate_fields(
    title: Option<&str>,
    description: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    if let Some(title) = title {
        validate::required_text("title", title, validate::MAX_TITLE_LEN)?;
    }
    if let Some(description) = description {
        validate::max_len("description", description, validate::MAX_TASK_DESCRIPTION_LEN)?;
    }
    if let Some(color) = color {
        validate::color(color)?;
    }
    Ok(())
}

fn to_value(task: &Task) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(task)?)
}
