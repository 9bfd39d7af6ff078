//! File-backed profile storage.
//!
//! The durable analogue of a browser profile's local storage: one
//! directory per profile, one `<key>.json` document per storage key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quiver_application::ports::{ProfileStorage, StorageError};

/// `ProfileStorage` implementation over a profile directory.
#[derive(Debug, Clone)]
pub struct FileProfileStorage {
    root: PathBuf,
}

impl FileProfileStorage {
    /// Opens (creating if needed) the profile directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the profile directory this storage writes into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl ProfileStorage for FileProfileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.document_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Io(error)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.document_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.document_path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_read_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileProfileStorage::open(dir.path()).unwrap();
        assert!(storage.read("rest.collections").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileProfileStorage::open(dir.path()).unwrap();

        storage.write("rest.collections", "[]").unwrap();
        assert_eq!(storage.read("rest.collections").unwrap().unwrap(), "[]");
        assert!(dir.path().join("rest.collections.json").exists());
    }

    #[test]
    fn test_write_replaces_previous_document() {
        let dir = tempdir().unwrap();
        let storage = FileProfileStorage::open(dir.path()).unwrap();

        storage.write("settings", r#"{"layout":"vertical"}"#).unwrap();
        storage.write("settings", r#"{"layout":"horizontal"}"#).unwrap();
        assert_eq!(
            storage.read("settings").unwrap().unwrap(),
            r#"{"layout":"horizontal"}"#
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = FileProfileStorage::open(dir.path()).unwrap();

        storage.write("rest.tabs", "{}").unwrap();
        storage.remove("rest.tabs").unwrap();
        storage.remove("rest.tabs").unwrap();
        assert!(storage.read("rest.tabs").unwrap().is_none());
    }

    #[test]
    fn test_open_creates_nested_profile_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("profiles").join("default");
        let storage = FileProfileStorage::open(&nested).unwrap();
        assert_eq!(storage.root(), nested);
        assert!(nested.is_dir());
    }
}
