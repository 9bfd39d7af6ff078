//! Session stores.
//!
//! Each store owns one slice of session state, wraps its mutations in
//! the same contract (apply in memory, notify same-context
//! subscribers, persist the durable subset, broadcast it) and merges
//! state published by other contexts when its owner pumps
//! `sync_remote()`. Stores are constructed once per context and passed
//! around explicitly; there is no ambient registry.

mod collection;
mod settings;
mod tabs;

pub use collection::{COLLECTIONS_KEY, CollectionStore};
pub use settings::{SETTINGS_KEY, SettingsStore};
pub use tabs::{CloseMode, TABS_KEY, TabStore};

/// Handle returned by `subscribe`, used to detach the callback again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(usize);

/// Same-context subscriber list.
///
/// Subscribers receive the full in-memory state after every local
/// mutation and every merged remote message.
pub(crate) struct Subscribers<T> {
    next: usize,
    entries: Vec<(usize, Box<dyn Fn(&T)>)>,
}

impl<T> Subscribers<T> {
    pub(crate) const fn new() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: Box<dyn Fn(&T)>) -> SubscriberId {
        let id = self.next;
        self.next += 1;
        self.entries.push((id, callback));
        SubscriberId(id)
    }

    pub(crate) fn remove(&mut self, id: SubscriberId) {
        self.entries.retain(|(entry, _)| *entry != id.0);
    }

    pub(crate) fn notify(&self, state: &T) {
        for (_, callback) in &self.entries {
            callback(state);
        }
    }
}

impl<T> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
