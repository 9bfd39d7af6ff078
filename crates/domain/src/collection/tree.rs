//! Pure tree repository over the collection forest.
//!
//! Every operation takes the forest by reference and returns a fresh
//! forest: nodes on the path from root to the matched node are rebuilt,
//! everything off that path is reused via [`Arc::clone`] (structural
//! sharing). Lookups that find nothing are silent no-ops: absence is a
//! normal state of a user-shaped tree, not a fault, so mutators hand
//! back the input forest (as shared pointers) and finders return `None`.

use std::sync::Arc;

use super::folder::{Folder, Forest};
use super::query::{FolderPatch, FolderQuery, RequestPatch, RequestQuery};
use crate::id::generate_id;
use crate::request::Request;

/// Finds the first folder matching the query, depth-first pre-order.
#[must_use]
pub fn find_folder<'a>(forest: &'a [Arc<Folder>], query: &FolderQuery) -> Option<&'a Arc<Folder>> {
    for folder in forest {
        if query.matches(folder) {
            return Some(folder);
        }
        if let Some(found) = find_folder(&folder.folders, query) {
            return Some(found);
        }
    }
    None
}

/// Finds the first request matching the query.
///
/// Each folder's own request list is scanned before descending into its
/// child folders.
#[must_use]
pub fn find_request<'a>(
    forest: &'a [Arc<Folder>],
    query: &RequestQuery,
) -> Option<&'a Arc<Request>> {
    for folder in forest {
        if let Some(request) = folder.requests.iter().find(|r| query.matches(r)) {
            return Some(request);
        }
        if let Some(found) = find_request(&folder.folders, query) {
            return Some(found);
        }
    }
    None
}

/// Appends a folder under the first folder matching `parent`.
///
/// An empty parent query appends at the forest root. When no parent
/// matches, the forest is returned unchanged; callers are expected to
/// have validated the parent exists.
#[must_use]
pub fn create_folder(forest: &[Arc<Folder>], parent: &FolderQuery, folder: Folder) -> Forest {
    let folder = Arc::new(folder);
    if parent.is_empty() {
        let mut next = forest.to_vec();
        next.push(folder);
        return next;
    }
    insert_folder(forest, parent, &folder).unwrap_or_else(|| forest.to_vec())
}

/// Appends a request to the first folder matching `parent`.
///
/// Same matching and rebuild discipline as [`create_folder`]; requests
/// cannot live at the forest root, so an empty parent query is a no-op.
#[must_use]
pub fn create_request(forest: &[Arc<Folder>], parent: &FolderQuery, request: Request) -> Forest {
    let request = Arc::new(request);
    insert_request(forest, parent, &request).unwrap_or_else(|| forest.to_vec())
}

/// Shallow-merges `patch` onto the first folder matching the query.
#[must_use]
pub fn update_folder(forest: &[Arc<Folder>], query: &FolderQuery, patch: &FolderPatch) -> Forest {
    patch_folder(forest, query, patch).unwrap_or_else(|| forest.to_vec())
}

/// Shallow-merges `patch` onto the first request matching the query.
#[must_use]
pub fn update_request(forest: &[Arc<Folder>], query: &RequestQuery, patch: &RequestPatch) -> Forest {
    patch_request(forest, query, patch).unwrap_or_else(|| forest.to_vec())
}

/// Removes the first folder matching the query, wherever it is found.
///
/// Nodes are compared by query-equality, not by reference; when several
/// structurally identical folders match, exactly the first in pre-order
/// is excised.
#[must_use]
pub fn remove_folder(forest: &[Arc<Folder>], query: &FolderQuery) -> Forest {
    excise_folder(forest, query).unwrap_or_else(|| forest.to_vec())
}

/// Removes the first request matching the query.
#[must_use]
pub fn remove_request(forest: &[Arc<Folder>], query: &RequestQuery) -> Forest {
    excise_request(forest, query).unwrap_or_else(|| forest.to_vec())
}

/// Case-insensitive substring filter over the forest.
///
/// A folder survives when its own name matches, or it keeps at least
/// one request, or at least one child folder survives, so the ancestry
/// of every surviving match is preserved. Request survival is a
/// substring match on the request name. Filtering an already-filtered
/// forest with the same text shrinks nothing further.
#[must_use]
pub fn filter_tree(forest: &[Arc<Folder>], search: &str) -> Forest {
    let needle = search.to_lowercase();
    filter_folders(forest, &needle)
}

/// Deep-clones the forest with every folder and request id regenerated.
///
/// Used when importing a tree exported elsewhere, so imported nodes can
/// never collide with ids already present in the live forest.
#[must_use]
pub fn reassign_ids(forest: &[Arc<Folder>]) -> Forest {
    forest
        .iter()
        .map(|folder| Arc::new(reassign_folder(folder)))
        .collect()
}

/// Clones the forest vector replacing the entry at `index`.
fn replace_at(forest: &[Arc<Folder>], index: usize, updated: Folder) -> Forest {
    let mut next = forest.to_vec();
    next[index] = Arc::new(updated);
    next
}

fn insert_folder(
    forest: &[Arc<Folder>],
    parent: &FolderQuery,
    new_folder: &Arc<Folder>,
) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if parent.matches(folder) {
            let mut updated = Folder::clone(folder);
            updated.folders.push(Arc::clone(new_folder));
            return Some(replace_at(forest, index, updated));
        }
        if let Some(children) = insert_folder(&folder.folders, parent, new_folder) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn insert_request(
    forest: &[Arc<Folder>],
    parent: &FolderQuery,
    new_request: &Arc<Request>,
) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if parent.matches(folder) {
            let mut updated = Folder::clone(folder);
            updated.requests.push(Arc::clone(new_request));
            return Some(replace_at(forest, index, updated));
        }
        if let Some(children) = insert_request(&folder.folders, parent, new_request) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn patch_folder(
    forest: &[Arc<Folder>],
    query: &FolderQuery,
    patch: &FolderPatch,
) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if query.matches(folder) {
            return Some(replace_at(forest, index, patch.apply(folder)));
        }
        if let Some(children) = patch_folder(&folder.folders, query, patch) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn patch_request(
    forest: &[Arc<Folder>],
    query: &RequestQuery,
    patch: &RequestPatch,
) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if let Some(position) = folder.requests.iter().position(|r| query.matches(r)) {
            let mut updated = Folder::clone(folder);
            updated.requests[position] = Arc::new(patch.apply(&folder.requests[position]));
            return Some(replace_at(forest, index, updated));
        }
        if let Some(children) = patch_request(&folder.folders, query, patch) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn excise_folder(forest: &[Arc<Folder>], query: &FolderQuery) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if query.matches(folder) {
            let mut next = forest.to_vec();
            next.remove(index);
            return Some(next);
        }
        if let Some(children) = excise_folder(&folder.folders, query) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn excise_request(forest: &[Arc<Folder>], query: &RequestQuery) -> Option<Forest> {
    for (index, folder) in forest.iter().enumerate() {
        if let Some(position) = folder.requests.iter().position(|r| query.matches(r)) {
            let mut updated = Folder::clone(folder);
            updated.requests.remove(position);
            return Some(replace_at(forest, index, updated));
        }
        if let Some(children) = excise_request(&folder.folders, query) {
            let mut updated = Folder::clone(folder);
            updated.folders = children;
            return Some(replace_at(forest, index, updated));
        }
    }
    None
}

fn filter_folders(forest: &[Arc<Folder>], needle: &str) -> Forest {
    forest
        .iter()
        .filter_map(|folder| {
            let name_match = folder.name.to_lowercase().contains(needle);
            let requests: Vec<Arc<Request>> = folder
                .requests
                .iter()
                .filter(|request| request.name.to_lowercase().contains(needle))
                .cloned()
                .collect();
            let folders = filter_folders(&folder.folders, needle);

            if name_match || !requests.is_empty() || !folders.is_empty() {
                Some(Arc::new(Folder {
                    id: folder.id,
                    name: folder.name.clone(),
                    requests,
                    folders,
                }))
            } else {
                None
            }
        })
        .collect()
}

fn reassign_folder(folder: &Folder) -> Folder {
    Folder {
        id: generate_id(),
        name: folder.name.clone(),
        requests: folder
            .requests
            .iter()
            .map(|request| {
                Arc::new(Request {
                    id: generate_id(),
                    ..Request::clone(request)
                })
            })
            .collect(),
        folders: reassign_ids(&folder.folders),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::request::Method;

    fn folder_named(name: &str) -> Folder {
        Folder::new(name)
    }

    /// Auth
    /// ├── Login (request)
    /// └── Tokens
    ///     └── Refresh (request)
    /// Users
    /// └── Get Users (request)
    fn sample_forest() -> Forest {
        let mut tokens = folder_named("Tokens");
        tokens.requests.push(Arc::new(Request::new("Refresh")));

        let mut auth = folder_named("Auth");
        auth.requests.push(Arc::new(Request::new("Login")));
        auth.folders.push(Arc::new(tokens));

        let mut users = folder_named("Users");
        users.requests.push(Arc::new(Request::new("Get Users")));

        vec![Arc::new(auth), Arc::new(users)]
    }

    #[test]
    fn test_find_folder_pre_order() {
        let forest = sample_forest();
        let found = find_folder(&forest, &FolderQuery::by_name("Tokens")).unwrap();
        assert_eq!(found.name, "Tokens");
        assert!(find_folder(&forest, &FolderQuery::by_name("Missing")).is_none());
    }

    #[test]
    fn test_find_folder_empty_query_matches_nothing() {
        let forest = sample_forest();
        assert!(find_folder(&forest, &FolderQuery::default()).is_none());
        assert!(find_request(&forest, &RequestQuery::default()).is_none());
    }

    #[test]
    fn test_find_request_scans_requests_before_descending() {
        let forest = sample_forest();
        let found = find_request(&forest, &RequestQuery::by_name("Refresh")).unwrap();
        assert_eq!(found.name, "Refresh");
    }

    #[test]
    fn test_create_folder_at_root() {
        let forest = sample_forest();
        let next = create_folder(&forest, &FolderQuery::default(), folder_named("Misc"));
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].name, "Misc");
        // Existing roots are reused, not copied.
        assert!(Arc::ptr_eq(&forest[0], &next[0]));
        assert!(Arc::ptr_eq(&forest[1], &next[1]));
    }

    #[test]
    fn test_create_folder_nested_rebuilds_only_the_path() {
        let forest = sample_forest();
        let next = create_folder(
            &forest,
            &FolderQuery::by_name("Tokens"),
            folder_named("Revoked"),
        );

        // Sibling root untouched by identity.
        assert!(Arc::ptr_eq(&forest[1], &next[1]));
        // Path rebuilt: Auth and Tokens are fresh nodes.
        assert!(!Arc::ptr_eq(&forest[0], &next[0]));
        let tokens = find_folder(&next, &FolderQuery::by_name("Tokens")).unwrap();
        assert_eq!(tokens.folders.len(), 1);
        assert_eq!(tokens.folders[0].name, "Revoked");
        // The request leaf hanging off Auth is shared with the old tree.
        assert!(Arc::ptr_eq(&forest[0].requests[0], &next[0].requests[0]));
    }

    #[test]
    fn test_create_folder_missing_parent_is_silent() {
        let forest = sample_forest();
        let next = create_folder(
            &forest,
            &FolderQuery::by_name("Missing"),
            folder_named("Orphan"),
        );
        assert_eq!(forest, next);
        assert!(Arc::ptr_eq(&forest[0], &next[0]));
    }

    #[test]
    fn test_create_and_find_round_trip() {
        let f1 = Uuid::parse_str("00000000-0000-0000-0000-0000000000f1").unwrap();
        let r1 = Uuid::parse_str("00000000-0000-0000-0000-0000000000a1").unwrap();

        let forest = create_folder(
            &[],
            &FolderQuery::default(),
            Folder {
                id: f1,
                name: "Auth".to_string(),
                requests: Vec::new(),
                folders: Vec::new(),
            },
        );
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, f1);

        let forest = create_request(
            &forest,
            &FolderQuery::by_id(f1),
            Request {
                id: r1,
                name: "Login".to_string(),
                url: "https://api.example.com/login".to_string(),
                method: Method::Post,
                ..Request::new("Login")
            },
        );
        assert_eq!(forest[0].requests.len(), 1);

        let found = find_request(&forest, &RequestQuery::by_id(r1)).unwrap();
        assert_eq!(found.name, "Login");
        assert_eq!(found.method, Method::Post);
        assert_eq!(found.url, "https://api.example.com/login");
    }

    #[test]
    fn test_update_request_structural_sharing() {
        let forest = sample_forest();
        let refresh_id = forest[0].folders[0].requests[0].id;

        let next = update_request(
            &forest,
            &RequestQuery::by_id(refresh_id),
            &RequestPatch {
                url: Some("https://api.example.com/refresh".to_string()),
                ..RequestPatch::default()
            },
        );

        // Unrelated branch keeps its identity.
        assert!(Arc::ptr_eq(&forest[1], &next[1]));
        // The sibling request inside the rebuilt folder is shared too.
        assert!(Arc::ptr_eq(&forest[0].requests[0], &next[0].requests[0]));

        let updated = find_request(&next, &RequestQuery::by_id(refresh_id)).unwrap();
        assert_eq!(updated.url, "https://api.example.com/refresh");
        assert_eq!(updated.name, "Refresh");
        // Input forest is untouched.
        assert_eq!(
            find_request(&forest, &RequestQuery::by_id(refresh_id))
                .unwrap()
                .url,
            crate::request::DEFAULT_REQUEST_URL
        );
    }

    #[test]
    fn test_update_folder_missing_is_silent() {
        let forest = sample_forest();
        let next = update_folder(
            &forest,
            &FolderQuery::by_name("Missing"),
            &FolderPatch::rename("Renamed"),
        );
        assert_eq!(forest, next);
    }

    #[test]
    fn test_remove_folder_nested() {
        let forest = sample_forest();
        let next = remove_folder(&forest, &FolderQuery::by_name("Tokens"));
        assert!(find_folder(&next, &FolderQuery::by_name("Tokens")).is_none());
        assert!(find_request(&next, &RequestQuery::by_name("Refresh")).is_none());
        // Login survives in the rebuilt Auth folder.
        assert!(find_request(&next, &RequestQuery::by_name("Login")).is_some());
        assert!(Arc::ptr_eq(&forest[1], &next[1]));
    }

    #[test]
    fn test_remove_folder_removes_exactly_first_match() {
        let twin_a = folder_named("Twin");
        let twin_b = folder_named("Twin");
        let forest: Forest = vec![Arc::new(twin_a), Arc::new(twin_b)];

        let next = remove_folder(&forest, &FolderQuery::by_name("Twin"));
        assert_eq!(next.len(), 1);
        assert!(Arc::ptr_eq(&forest[1], &next[0]));
    }

    #[test]
    fn test_remove_request_leaves_folders_in_place() {
        let forest = sample_forest();
        let next = remove_request(&forest, &RequestQuery::by_name("Login"));
        assert!(find_request(&next, &RequestQuery::by_name("Login")).is_none());
        assert_eq!(next[0].requests.len(), 0);
        assert_eq!(next[0].folders.len(), 1);
    }

    #[test]
    fn test_filter_tree_preserves_ancestry() {
        let forest = sample_forest();
        let filtered = filter_tree(&forest, "refresh");

        // Only the Auth branch survives, trimmed down to the hit.
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Auth");
        assert!(filtered[0].requests.is_empty());
        assert_eq!(filtered[0].folders[0].requests[0].name, "Refresh");
    }

    #[test]
    fn test_filter_tree_matches_folder_names() {
        let forest = sample_forest();
        let filtered = filter_tree(&forest, "users");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Users");
    }

    #[test]
    fn test_filter_tree_is_case_insensitive() {
        let forest = sample_forest();
        assert_eq!(filter_tree(&forest, "LOGIN"), filter_tree(&forest, "login"));
    }

    #[test]
    fn test_filter_tree_idempotent() {
        let forest = sample_forest();
        let once = filter_tree(&forest, "re");
        let twice = filter_tree(&once, "re");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reassign_ids_fresh_everywhere() {
        let forest = sample_forest();
        let reassigned = reassign_ids(&forest);

        let mut original_ids = HashSet::new();
        let mut new_ids = HashSet::new();
        collect_ids(&forest, &mut original_ids);
        collect_ids(&reassigned, &mut new_ids);

        assert_eq!(original_ids.len(), new_ids.len());
        assert!(original_ids.is_disjoint(&new_ids));
        // Structure and names survive.
        assert_eq!(reassigned[0].name, "Auth");
        assert_eq!(reassigned[0].folders[0].requests[0].name, "Refresh");
    }

    #[test]
    fn test_reassign_ids_deduplicates_internal_collisions() {
        let shared = Arc::new(Request::new("Shared"));
        let mut first = folder_named("First");
        first.requests.push(Arc::clone(&shared));
        let mut second = folder_named("Second");
        second.requests.push(shared);

        let reassigned = reassign_ids(&[Arc::new(first), Arc::new(second)]);
        assert_ne!(
            reassigned[0].requests[0].id,
            reassigned[1].requests[0].id
        );
    }

    fn collect_ids(forest: &[Arc<Folder>], ids: &mut HashSet<Uuid>) {
        for folder in forest {
            ids.insert(folder.id);
            for request in &folder.requests {
                ids.insert(request.id);
            }
            collect_ids(&folder.folders, ids);
        }
    }
}
