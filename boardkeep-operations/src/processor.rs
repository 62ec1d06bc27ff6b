//! Operation processors: run a command and route its audit entry

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Executes operations on behalf of a caller.
///
/// Implementations decide where the `LogEntry` of a logged operation goes
/// (an activity file, memory, nowhere) and which actor it is attributed to.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>;
}
