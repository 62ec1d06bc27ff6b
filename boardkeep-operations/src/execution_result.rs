//! Execution result types for operations

use crate::LogEntry;
use serde_json::Value;
use std::fmt::Display;
use std::time::Instant;

/// Outcome of executing an operation
///
/// - `Logged`: a mutation succeeded and belongs in the audit trail
/// - `Unlogged`: a read succeeded; nothing to record
/// - `Failed`: the operation failed, optionally with an audit entry
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Drop the log entry and keep the plain result
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Separate the result from its log entry
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Whether an audit entry is attached
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }

    /// Wrap the outcome of a read-only operation
    pub fn read(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

impl<E: Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutation, recording it whether it succeeded or not.
    ///
    /// Failures are logged with `{"error": message}` as their output.
    pub fn mutation(op: String, input: Value, started: Instant, result: Result<Value, E>) -> Self {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => Self::Logged {
                log_entry: LogEntry::new(op, input, value.clone(), None, duration_ms),
                value,
            },
            Err(error) => {
                let output = serde_json::json!({ "error": error.to_string() });
                Self::Failed {
                    log_entry: Some(LogEntry::new(op, input, output, None, duration_ms)),
                    error,
                }
            }
        }
    }
}
