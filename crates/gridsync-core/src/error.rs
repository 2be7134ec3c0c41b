//! Error types for the grid model and synchronization cycle.

use thiserror::Error;

use crate::ids::EntityId;

/// Errors raised by grid mutations and synchronization cycles.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid column order: {0}")]
    InvalidColumnOrder(String),
    #[error("Entity is disposed: {0}")]
    Disposed(EntityId),
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Malformed input for {target}.{field}: {reason}")]
    MalformedInput {
        target: String,
        field: String,
        reason: String,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    pub(crate) fn malformed(target: impl ToString, field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            target: target.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check an index against a length.
    pub(crate) fn check_index(index: usize, len: usize) -> GridResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
