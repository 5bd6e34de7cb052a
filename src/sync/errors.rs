use thiserror::Error;

use crate::storage::StorageError;

/// Errors reported by tracker commands
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Edit mode is disabled")]
    EditModeDisabled,

    #[error("Tracker data has not been loaded")]
    NotLoaded,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }
}
