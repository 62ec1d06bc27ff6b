//! Error types for boardkeep

use thiserror::Error;

/// Result type for boardkeep operations
pub type Result<T> = std::result::Result<T, BoardkeepError>;

/// Errors that can occur in boardkeep operations
#[derive(Debug, Error)]
pub enum BoardkeepError {
    /// A referenced board, column or task does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Reorder across parents, or a reparent target that does not exist
    #[error("invalid parent for {resource} '{id}': {parent}")]
    InvalidParent {
        resource: String,
        id: String,
        parent: String,
    },

    /// A sibling (or, for boards, any board) already carries this name
    #[error("{resource} with name '{name}' already exists")]
    DuplicateName { resource: String, name: String },

    /// Malformed input
    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// The item kept moving between parents while we tried to lock it
    #[error("conflicting concurrent move of '{id}' after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },

    /// The store lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    #[error("lock timeout after {elapsed_ms}ms")]
    LockTimeout { elapsed_ms: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardkeepError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid_parent(
        resource: impl Into<String>,
        id: impl ToString,
        parent: impl ToString,
    ) -> Self {
        Self::InvalidParent {
            resource: resource.into(),
            id: id.to_string(),
            parent: parent.to_string(),
        }
    }

    pub fn duplicate_name(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            resource: resource.into(),
            name: name.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP-style status: 404 absent, 400 invariant or input violations,
    /// 409 contention, 500 store failures
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidParent { .. } | Self::DuplicateName { .. } | Self::Validation { .. } => {
                400
            }
            Self::Conflict { .. } | Self::LockBusy | Self::LockTimeout { .. } => 409,
            Self::Config(_) | Self::Io(_) | Self::Json(_) => 500,
        }
    }

    /// Caller-side problem, as opposed to a store or environment failure
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy | Self::Conflict { .. })
    }
}
