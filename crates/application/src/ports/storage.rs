//! Durable profile storage port

use thiserror::Error;

/// Errors from the durable storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store failed an I/O operation.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store scoped to one browser-profile-like storage area.
///
/// Values are serialized JSON documents, one per fixed key (collection
/// forest, tab session, settings). Stores write through on every
/// mutation and never retry; failures propagate to the caller after
/// in-memory state has already been updated.
pub trait ProfileStorage {
    /// Reads the document stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the document under `key`; absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
