//! # Boardkeep Operations
//!
//! Commands are plain structs whose fields are their parameters. The
//! `#[operation]` attribute gives them a verb and a noun, `Execute` gives them
//! behavior against some context, and an `OperationProcessor` decides what to
//! do with the audit entry every mutating command produces.
//!
//! ```ignore
//! use boardkeep_operations::*;
//!
//! #[operation(verb = "add", noun = "task", description = "Create a new task")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddTask {
//!     pub column: ColumnId,
//!     pub title: String,
//! }
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardkeepError> for AddTask {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardkeepError> {
//!         // mutate, then return ExecutionResult::Logged
//!     }
//! }
//! ```

// Lets the `#[operation]` expansion resolve `::boardkeep_operations` inside this crate's tests.
extern crate self as boardkeep_operations;

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use boardkeep_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
