//! Folder node type

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_id;
use crate::request::{DEFAULT_NAME, Request};

/// The top-level ordered collection of folder trees.
///
/// Nodes are held behind [`Arc`] so successive forest snapshots share
/// every branch the mutation did not touch; unrelated subscriptions can
/// compare subtrees with [`Arc::ptr_eq`] and skip re-rendering.
pub type Forest = Vec<Arc<Folder>>;

/// A named node owning an ordered list of child folders and requests.
///
/// Order matters for display; both lists are recursed over by the tree
/// repository in [`crate::collection::tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier within the collection forest
    pub id: Uuid,
    /// Folder name
    pub name: String,
    /// Request leaves owned by this folder
    #[serde(default)]
    pub requests: Vec<Arc<Request>>,
    /// Child folders
    #[serde(default)]
    pub folders: Vec<Arc<Folder>>,
}

impl Folder {
    /// Creates a new empty folder with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            requests: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Returns the total number of requests in this subtree.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.len()
            + self
                .folders
                .iter()
                .map(|folder| folder.request_count())
                .sum::<usize>()
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_folder_creation() {
        let folder = Folder::new("My API");
        assert_eq!(folder.name, "My API");
        assert!(folder.requests.is_empty());
        assert!(folder.folders.is_empty());
    }

    #[test]
    fn test_request_count_recursive() {
        let mut inner = Folder::new("Users");
        inner.requests.push(Arc::new(Request::new("Get Users")));
        inner.requests.push(Arc::new(Request::new("Create User")));

        let mut root = Folder::new("API");
        root.requests.push(Arc::new(Request::new("Health")));
        root.folders.push(Arc::new(inner));

        assert_eq!(root.request_count(), 3);
    }
}
