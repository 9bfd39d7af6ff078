//! Query and patch types for tree repository operations

use std::sync::Arc;

use uuid::Uuid;

use super::folder::Folder;
use crate::request::{HeaderEntry, KeyValue, Method, Request, RequestBody};

/// Field-equality query against folders.
///
/// A query is the conjunction of every supplied field; an empty query
/// matches nothing, so an unrestricted traversal can never accidentally
/// return its first node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderQuery {
    /// Match on folder id
    pub id: Option<Uuid>,
    /// Match on folder name (exact, not substring)
    pub name: Option<String>,
}

impl FolderQuery {
    /// Query matching the folder with the given id.
    #[must_use]
    pub const fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    /// Query matching the first folder with the given name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Returns true when no field is constrained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Whether the folder satisfies every supplied field.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn matches(&self, folder: &Folder) -> bool {
        if self.is_empty() {
            return false;
        }
        self.id.is_none_or(|id| folder.id == id)
            && self.name.as_ref().is_none_or(|name| &folder.name == name)
    }
}

/// Field-equality query against requests, same semantics as [`FolderQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    /// Match on request id
    pub id: Option<Uuid>,
    /// Match on request name (exact)
    pub name: Option<String>,
    /// Match on request URL (exact)
    pub url: Option<String>,
    /// Match on request method
    pub method: Option<Method>,
}

impl RequestQuery {
    /// Query matching the request with the given id.
    #[must_use]
    pub const fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            name: None,
            url: None,
            method: None,
        }
    }

    /// Query matching the first request with the given name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns true when no field is constrained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.url.is_none() && self.method.is_none()
    }

    /// Whether the request satisfies every supplied field.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        if self.is_empty() {
            return false;
        }
        self.id.is_none_or(|id| request.id == id)
            && self.name.as_ref().is_none_or(|name| &request.name == name)
            && self.url.as_ref().is_none_or(|url| &request.url == url)
            && self.method.is_none_or(|method| request.method == method)
    }
}

/// Shallow patch applied to a matched folder.
///
/// Supplied fields replace the folder's; absent fields pass through.
/// The id is never patched.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    /// New folder name
    pub name: Option<String>,
    /// Replacement request list
    pub requests: Option<Vec<Arc<Request>>>,
    /// Replacement child-folder list
    pub folders: Option<Vec<Arc<Folder>>>,
}

impl FolderPatch {
    /// Patch renaming a folder.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Applies the patch, producing the merged folder.
    #[must_use]
    pub fn apply(&self, folder: &Folder) -> Folder {
        Folder {
            id: folder.id,
            name: self.name.clone().unwrap_or_else(|| folder.name.clone()),
            requests: self
                .requests
                .clone()
                .unwrap_or_else(|| folder.requests.clone()),
            folders: self
                .folders
                .clone()
                .unwrap_or_else(|| folder.folders.clone()),
        }
    }
}

impl From<Folder> for FolderPatch {
    fn from(folder: Folder) -> Self {
        Self {
            name: Some(folder.name),
            requests: Some(folder.requests),
            folders: Some(folder.folders),
        }
    }
}

/// Shallow patch applied to a matched request. The id is never patched.
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    /// New request name
    pub name: Option<String>,
    /// New target URL
    pub url: Option<String>,
    /// New HTTP method
    pub method: Option<Method>,
    /// Replacement query parameters
    pub params: Option<Vec<KeyValue>>,
    /// Replacement headers
    pub headers: Option<Vec<HeaderEntry>>,
    /// Replacement body
    pub body: Option<RequestBody>,
}

impl RequestPatch {
    /// Patch renaming a request.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Applies the patch, producing the merged request.
    #[must_use]
    pub fn apply(&self, request: &Request) -> Request {
        Request {
            id: request.id,
            name: self.name.clone().unwrap_or_else(|| request.name.clone()),
            url: self.url.clone().unwrap_or_else(|| request.url.clone()),
            method: self.method.unwrap_or(request.method),
            params: self.params.clone().unwrap_or_else(|| request.params.clone()),
            headers: self
                .headers
                .clone()
                .unwrap_or_else(|| request.headers.clone()),
            body: self.body.clone().unwrap_or_else(|| request.body.clone()),
        }
    }
}

impl From<Request> for RequestPatch {
    fn from(request: Request) -> Self {
        Self {
            name: Some(request.name),
            url: Some(request.url),
            method: Some(request.method),
            params: Some(request.params),
            headers: Some(request.headers),
            body: Some(request.body),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_query_matches_nothing() {
        let folder = Folder::new("Auth");
        assert!(!FolderQuery::default().matches(&folder));

        let request = Request::new("Login");
        assert!(!RequestQuery::default().matches(&request));
    }

    #[test]
    fn test_query_is_conjunction() {
        let folder = Folder::new("Auth");
        let matching = FolderQuery {
            id: Some(folder.id),
            name: Some("Auth".to_string()),
        };
        assert!(matching.matches(&folder));

        let conflicting = FolderQuery {
            id: Some(folder.id),
            name: Some("Other".to_string()),
        };
        assert!(!conflicting.matches(&folder));
    }

    #[test]
    fn test_folder_patch_keeps_unspecified_fields() {
        let mut folder = Folder::new("Auth");
        folder.requests.push(Arc::new(Request::new("Login")));

        let patched = FolderPatch::rename("Sessions").apply(&folder);
        assert_eq!(patched.name, "Sessions");
        assert_eq!(patched.id, folder.id);
        assert_eq!(patched.requests.len(), 1);
    }

    #[test]
    fn test_request_patch_from_full_request() {
        let original = Request::new("Login");
        let mut edited = original.clone();
        edited.url = "https://api.example.com/login".to_string();
        edited.method = Method::Post;

        let patched = RequestPatch::from(edited.clone()).apply(&original);
        assert_eq!(patched, edited);
    }
}
