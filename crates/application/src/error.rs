//! Application error types

use thiserror::Error;

use crate::ports::StorageError;

/// Errors surfaced by store operations.
///
/// Ordinary absence (a lookup, update or close target that does not
/// exist) is never an error; those are silent no-ops. Only genuinely
/// exceptional conditions reach this type, and by the time they do the
/// in-memory state has already been updated.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Durable storage failed or is unavailable.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// State could not be serialized for persistence or broadcast.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
