//! The `Operation` metadata trait and the `Execute` behavior trait

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Static description of a command, usually derived with `#[operation]`
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The entity acted upon, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One line of help text
    fn description(&self) -> &'static str;

    /// Field names of the command struct, in declaration order
    fn parameters(&self) -> &'static [&'static str];

    /// Canonical op string recorded in the activity log ("move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}
