//! Tab store: the open editing session.

use std::sync::Arc;

use uuid::Uuid;

use quiver_domain::{
    EditorPane, Request, RequestPatch, ResultPatch, Tab, TabResult, TabSession, TabSnapshot,
};

use super::{SubscriberId, Subscribers};
use crate::error::StoreResult;
use crate::ports::{ProfileStorage, SyncChannel, SyncHub};

/// Storage key (and channel name) for the tab session.
pub const TABS_KEY: &str = "rest.tabs";

/// How [`TabStore::close_tabs`] interprets the id list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Close the listed tabs.
    Normal,
    /// Keep only the listed tabs.
    Others,
    /// Close everything; the id list is ignored.
    All,
}

/// Owns the set of open work tabs for one context.
///
/// Only `{tabs, current}` travel to durable storage and across
/// contexts; `tainted` and `results` describe this context's own
/// editing and network state and never leave it.
pub struct TabStore<S, C> {
    storage: Arc<S>,
    channel: C,
    session: TabSession,
    subscribers: Subscribers<TabSession>,
}

impl<S, C> TabStore<S, C>
where
    S: ProfileStorage,
    C: SyncChannel,
{
    /// Opens the store against the given storage and hub.
    ///
    /// Same seeding contract as the collection store: absent state is
    /// written once from `initial`, malformed state falls back to
    /// `initial`, stored state wins otherwise. Ephemeral fields always
    /// start empty.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read or seeded.
    pub fn open<H>(storage: Arc<S>, hub: &H, initial: TabSnapshot) -> StoreResult<Self>
    where
        H: SyncHub<Channel = C>,
    {
        let channel = hub.channel(TABS_KEY);
        let snapshot = match storage.read(TABS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(%error, "stored tab session is malformed, using defaults");
                initial
            }),
            None => {
                storage.write(TABS_KEY, &serde_json::to_string(&initial)?)?;
                initial
            }
        };

        Ok(Self {
            storage,
            channel,
            session: TabSession {
                tabs: snapshot.tabs,
                current: snapshot.current,
                tainted: Vec::new(),
                results: Vec::new(),
            },
            subscribers: Subscribers::new(),
        })
    }

    /// Returns the full in-memory session.
    #[must_use]
    pub const fn session(&self) -> &TabSession {
        &self.session
    }

    /// Returns the focused tab id, if any.
    #[must_use]
    pub const fn current(&self) -> Option<Uuid> {
        self.session.current
    }

    /// Returns the tab with the given id, if open.
    #[must_use]
    pub fn get_tab(&self, id: Uuid) -> Option<&Tab> {
        self.session.tab(id)
    }

    /// Opens a new tab and focuses it.
    ///
    /// With a request, the tab wraps it and takes the request's own id
    /// (the flow for editing a saved request); without one, a blank
    /// default request is synthesized under a fresh shared id. Returns
    /// the tab id.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn add_tab(&mut self, request: Option<Request>) -> StoreResult<Uuid> {
        let tab = request.map_or_else(Tab::blank, Tab::for_request);
        let id = tab.id;
        tracing::debug!(%id, "opening tab");

        self.session.tabs.push(tab);
        self.session.current = Some(id);
        self.commit()?;
        Ok(id)
    }

    /// Shallow-merges `patch` into the tab's request snapshot.
    ///
    /// No-op when the tab is not open.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn update_tab(&mut self, id: Uuid, patch: &RequestPatch) -> StoreResult<()> {
        let Some(tab) = self.session.tabs.iter_mut().find(|tab| tab.id == id) else {
            return Ok(());
        };
        tab.context = patch.apply(&tab.context);
        self.commit()
    }

    /// Deep-clones a tab and inserts the copy right after the source.
    ///
    /// The copy gets a fresh tab id, its request snapshot is re-keyed
    /// under the same fresh id so it can never collide with the
    /// original, and it becomes current. Returns the new tab id, or
    /// `None` when the source is not open.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn duplicate_tab(&mut self, id: Uuid) -> StoreResult<Option<Uuid>> {
        let Some(index) = self.session.tabs.iter().position(|tab| tab.id == id) else {
            return Ok(None);
        };

        let source = &self.session.tabs[index];
        let new_id = quiver_domain::generate_id();
        let duplicate = Tab {
            id: new_id,
            context: Request {
                id: new_id,
                ..source.context.clone()
            },
            current_tab: EditorPane::Params,
            dirty: false,
        };

        self.session.tabs.insert(index + 1, duplicate);
        self.session.current = Some(new_id);
        self.commit()?;
        Ok(Some(new_id))
    }

    /// Focuses the tab with the given id.
    ///
    /// No-op when the tab is not open or already current, so redundant
    /// clicks do not re-persist and re-broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn set_current_tab(&mut self, id: Uuid) -> StoreResult<()> {
        if self.session.current == Some(id) || self.session.tab(id).is_none() {
            return Ok(());
        }
        self.session.current = Some(id);
        self.commit()
    }

    /// Switches the active editor pane of a tab. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn set_current_inner_tab(&mut self, id: Uuid, pane: EditorPane) -> StoreResult<()> {
        let Some(tab) = self.session.tabs.iter_mut().find(|tab| tab.id == id) else {
            return Ok(());
        };
        tab.current_tab = pane;
        self.commit()
    }

    /// Replaces the tainted set.
    ///
    /// `None` clears it; otherwise only ids of currently open tabs are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn set_tainted_tabs(&mut self, ids: Option<&[Uuid]>) -> StoreResult<()> {
        self.session.tainted = ids.map_or_else(Vec::new, |ids| {
            ids.iter()
                .copied()
                .filter(|id| self.session.tab(*id).is_some())
                .collect()
        });
        self.commit()
    }

    /// Bulk-sets the dirty flag on every listed open tab.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn set_dirty_tabs(&mut self, ids: &[Uuid], dirty: bool) -> StoreResult<()> {
        for tab in &mut self.session.tabs {
            if ids.contains(&tab.id) {
                tab.dirty = dirty;
            }
        }
        self.commit()
    }

    /// Upserts the result entry of an open tab.
    ///
    /// An absent entry is created, a present one is shallow-merged;
    /// `None` resets the entry to its empty shape. No-op when the tab
    /// is not open.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn set_result(&mut self, id: Uuid, patch: Option<ResultPatch>) -> StoreResult<()> {
        if self.session.tab(id).is_none() {
            return Ok(());
        }

        let position = self.session.results.iter().position(|entry| entry.id == id);
        match (position, patch) {
            (Some(index), Some(patch)) => {
                let entry = &mut self.session.results[index];
                if let Some(response) = patch.response {
                    entry.response = Some(response);
                }
                if let Some(sending) = patch.sending {
                    entry.sending = sending;
                }
            }
            (Some(index), None) => {
                self.session.results[index] = TabResult {
                    id,
                    response: None,
                    sending: false,
                };
            }
            (None, patch) => {
                let patch = patch.unwrap_or_default();
                self.session.results.push(TabResult {
                    id,
                    response: patch.response,
                    sending: patch.sending.unwrap_or(false),
                });
            }
        }
        self.commit()
    }

    /// Closes tabs according to `mode` and re-resolves `current`.
    ///
    /// `current` reassignment always prefers the last remaining tab in
    /// array order. `tainted` and `results` entries of closed tabs are
    /// pruned in every mode.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn close_tabs(&mut self, ids: &[Uuid], mode: CloseMode) -> StoreResult<()> {
        match mode {
            CloseMode::Normal => {
                let closes_current = self
                    .session
                    .current
                    .is_some_and(|current| ids.contains(&current));
                self.session.tabs.retain(|tab| !ids.contains(&tab.id));
                if closes_current {
                    self.session.current = self.session.tabs.last().map(|tab| tab.id);
                }
            }
            CloseMode::Others => {
                self.session.tabs.retain(|tab| ids.contains(&tab.id));
                let current_survives = self
                    .session
                    .current
                    .is_some_and(|current| self.session.tab(current).is_some());
                if !current_survives {
                    self.session.current = self.session.tabs.last().map(|tab| tab.id);
                }
            }
            CloseMode::All => {
                self.session.tabs.clear();
                self.session.current = None;
            }
        }

        self.prune_ephemeral();
        self.commit()
    }

    /// Applies tab snapshots published by other contexts.
    ///
    /// Only `{tabs, current}` are merged; this context's `tainted` and
    /// `results` stay local, trimmed to whatever tabs remain open.
    pub fn sync_remote(&mut self) {
        let mut merged = false;
        while let Some(payload) = self.channel.try_recv() {
            match serde_json::from_value::<TabSnapshot>(payload) {
                Ok(snapshot) => {
                    self.session.tabs = snapshot.tabs;
                    self.session.current = snapshot.current;
                    merged = true;
                }
                Err(error) => {
                    tracing::warn!(%error, "ignoring malformed tab broadcast");
                }
            }
        }
        if merged {
            self.prune_ephemeral();
            self.subscribers.notify(&self.session);
        }
    }

    /// Registers a subscriber receiving the session after every change.
    pub fn subscribe(&mut self, callback: impl Fn(&TabSession) + 'static) -> SubscriberId {
        self.subscribers.add(Box::new(callback))
    }

    /// Detaches a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.remove(id);
    }

    /// Drops tainted/result entries whose tab is no longer open.
    fn prune_ephemeral(&mut self) {
        let tabs = &self.session.tabs;
        self.session
            .tainted
            .retain(|id| tabs.iter().any(|tab| tab.id == *id));
        self.session
            .results
            .retain(|entry| tabs.iter().any(|tab| tab.id == entry.id));
    }

    /// Notify, then persist the snapshot, then broadcast it.
    fn commit(&mut self) -> StoreResult<()> {
        self.subscribers.notify(&self.session);
        let payload = serde_json::to_value(self.session.snapshot())?;
        self.storage.write(TABS_KEY, &payload.to_string())?;
        self.channel.publish(payload);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use quiver_domain::{Method, ResponseDescriptor};

    use super::*;
    use crate::stores::testing::{MemoryChannel, MemoryHub, MemoryStorage};

    fn open_store(
        storage: &Arc<MemoryStorage>,
        hub: &MemoryHub,
    ) -> TabStore<MemoryStorage, MemoryChannel> {
        TabStore::open(Arc::clone(storage), hub, TabSnapshot::default()).unwrap()
    }

    fn fresh_store() -> TabStore<MemoryStorage, MemoryChannel> {
        open_store(&Arc::new(MemoryStorage::default()), &MemoryHub::default())
    }

    #[test]
    fn test_add_blank_tab_becomes_current() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();

        assert_eq!(store.current(), Some(id));
        let tab = store.get_tab(id).unwrap();
        assert_eq!(tab.context.id, id);
        assert_eq!(tab.context.name, "Untitled");
        assert!(!tab.dirty);
    }

    #[test]
    fn test_add_tab_for_saved_request_reuses_its_id() {
        let mut store = fresh_store();
        let request = Request::get("Login", "https://api.example.com/login");
        let request_id = request.id;

        let tab_id = store.add_tab(Some(request)).unwrap();
        assert_eq!(tab_id, request_id);
        assert_eq!(store.get_tab(tab_id).unwrap().context.url, "https://api.example.com/login");
    }

    #[test]
    fn test_update_tab_merges_into_context() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();

        store
            .update_tab(
                id,
                &RequestPatch {
                    method: Some(Method::Post),
                    url: Some("https://api.example.com/login".to_string()),
                    ..RequestPatch::default()
                },
            )
            .unwrap();

        let tab = store.get_tab(id).unwrap();
        assert_eq!(tab.context.method, Method::Post);
        assert_eq!(tab.context.url, "https://api.example.com/login");
        assert_eq!(tab.context.name, "Untitled");
    }

    #[test]
    fn test_update_missing_tab_is_silent() {
        let mut store = fresh_store();
        store
            .update_tab(quiver_domain::generate_id(), &RequestPatch::rename("Nope"))
            .unwrap();
        assert!(store.session().tabs.is_empty());
    }

    #[test]
    fn test_duplicate_tab_scenario() {
        let mut store = fresh_store();
        let first = store.add_tab(None).unwrap();
        let last = store.add_tab(None).unwrap();

        store
            .update_tab(first, &RequestPatch::rename("Original"))
            .unwrap();
        let copy = store.duplicate_tab(first).unwrap().unwrap();

        // Inserted right after the source, before the unrelated tab.
        let ids: Vec<Uuid> = store.session().tabs.iter().map(|tab| tab.id).collect();
        assert_eq!(ids, vec![first, copy, last]);

        let duplicate = store.get_tab(copy).unwrap();
        assert_ne!(copy, first);
        assert_ne!(duplicate.context.id, first);
        assert_eq!(duplicate.context.name, "Original");
        assert!(!duplicate.dirty);
        assert_eq!(store.current(), Some(copy));
    }

    #[test]
    fn test_set_current_tab_ignores_unknown_ids() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();

        store.set_current_tab(quiver_domain::generate_id()).unwrap();
        assert_eq!(store.current(), Some(id));
    }

    #[test]
    fn test_set_current_inner_tab() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();

        store.set_current_inner_tab(id, EditorPane::Headers).unwrap();
        assert_eq!(store.get_tab(id).unwrap().current_tab, EditorPane::Headers);
    }

    #[test]
    fn test_tainted_intersects_with_open_tabs() {
        let mut store = fresh_store();
        let open = store.add_tab(None).unwrap();
        let ghost = quiver_domain::generate_id();

        store.set_tainted_tabs(Some(&[open, ghost])).unwrap();
        assert_eq!(store.session().tainted, vec![open]);

        store.set_tainted_tabs(None).unwrap();
        assert!(store.session().tainted.is_empty());
    }

    #[test]
    fn test_set_dirty_tabs_bulk() {
        let mut store = fresh_store();
        let first = store.add_tab(None).unwrap();
        let second = store.add_tab(None).unwrap();

        store.set_dirty_tabs(&[first, second], true).unwrap();
        assert!(store.session().tabs.iter().all(|tab| tab.dirty));

        store.set_dirty_tabs(&[first], false).unwrap();
        assert!(!store.get_tab(first).unwrap().dirty);
        assert!(store.get_tab(second).unwrap().dirty);
    }

    #[test]
    fn test_set_result_upserts_and_merges() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();

        store
            .set_result(id, Some(ResultPatch::sending(true)))
            .unwrap();
        assert!(store.session().results[0].sending);
        assert!(store.session().results[0].response.is_none());

        let response = ResponseDescriptor {
            ok: true,
            status: 200,
            ..ResponseDescriptor::default()
        };
        store
            .set_result(id, Some(ResultPatch::completed(response)))
            .unwrap();
        let entry = &store.session().results[0];
        assert!(!entry.sending);
        assert_eq!(entry.response.as_ref().unwrap().status, 200);

        store.set_result(id, None).unwrap();
        assert!(store.session().results[0].response.is_none());
    }

    #[test]
    fn test_set_result_ignores_closed_tabs() {
        let mut store = fresh_store();
        store
            .set_result(quiver_domain::generate_id(), Some(ResultPatch::sending(true)))
            .unwrap();
        assert!(store.session().results.is_empty());
    }

    #[test]
    fn test_close_normal_reassigns_current_to_last() {
        let mut store = fresh_store();
        let first = store.add_tab(None).unwrap();
        let second = store.add_tab(None).unwrap();
        let third = store.add_tab(None).unwrap();
        store.set_current_tab(second).unwrap();

        store.close_tabs(&[second], CloseMode::Normal).unwrap();
        let ids: Vec<Uuid> = store.session().tabs.iter().map(|tab| tab.id).collect();
        assert_eq!(ids, vec![first, third]);
        // Closed set included current, so the last remaining tab wins.
        assert_eq!(store.current(), Some(third));
    }

    #[test]
    fn test_close_normal_keeps_unrelated_current() {
        let mut store = fresh_store();
        let first = store.add_tab(None).unwrap();
        let second = store.add_tab(None).unwrap();
        store.set_current_tab(first).unwrap();

        store.close_tabs(&[second], CloseMode::Normal).unwrap();
        assert_eq!(store.current(), Some(first));
    }

    #[test]
    fn test_close_normal_prunes_results_and_tainted() {
        let mut store = fresh_store();
        let keep = store.add_tab(None).unwrap();
        let gone = store.add_tab(None).unwrap();
        store.set_result(gone, Some(ResultPatch::sending(true))).unwrap();
        store.set_result(keep, Some(ResultPatch::sending(false))).unwrap();
        store.set_tainted_tabs(Some(&[keep, gone])).unwrap();

        store.close_tabs(&[gone], CloseMode::Normal).unwrap();
        assert_eq!(store.session().results.len(), 1);
        assert_eq!(store.session().results[0].id, keep);
        assert_eq!(store.session().tainted, vec![keep]);
    }

    #[test]
    fn test_close_others() {
        let mut store = fresh_store();
        let first = store.add_tab(None).unwrap();
        let second = store.add_tab(None).unwrap();
        let third = store.add_tab(None).unwrap();
        store.set_current_tab(first).unwrap();

        store.close_tabs(&[second], CloseMode::Others).unwrap();
        let ids: Vec<Uuid> = store.session().tabs.iter().map(|tab| tab.id).collect();
        assert_eq!(ids, vec![second]);
        assert!(store.get_tab(third).is_none());
        // Current was closed, the last (only) remaining tab wins.
        assert_eq!(store.current(), Some(second));
    }

    #[test]
    fn test_close_all_empties_everything() {
        let mut store = fresh_store();
        let id = store.add_tab(None).unwrap();
        store.set_result(id, Some(ResultPatch::sending(true))).unwrap();

        store.close_tabs(&[], CloseMode::All).unwrap();
        assert!(store.session().tabs.is_empty());
        assert!(store.session().results.is_empty());
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_close_last_tab_clears_current() {
        let mut store = fresh_store();
        let only = store.add_tab(None).unwrap();
        store.close_tabs(&[only], CloseMode::Normal).unwrap();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_only_snapshot_is_persisted() {
        let storage = Arc::new(MemoryStorage::default());
        let hub = MemoryHub::default();
        let mut store = open_store(&storage, &hub);

        let id = store.add_tab(None).unwrap();
        store.set_result(id, Some(ResultPatch::sending(true))).unwrap();

        let raw = storage.get(TABS_KEY).unwrap();
        let persisted: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(persisted.get("tabs").is_some());
        assert!(persisted.get("results").is_none());
        assert!(persisted.get("tainted").is_none());
    }

    #[test]
    fn test_cross_context_merge_keeps_local_ephemeral_state() {
        let storage = Arc::new(MemoryStorage::default());
        let hub = MemoryHub::default();
        let mut context_a = open_store(&storage, &hub);
        let mut context_b = open_store(&storage, &hub);

        let shared = context_a.add_tab(None).unwrap();

        context_b.sync_remote();
        assert_eq!(context_b.session().tabs.len(), 1);
        assert_eq!(context_b.current(), Some(shared));

        // B records a local result, then A opens another tab.
        context_b
            .set_result(shared, Some(ResultPatch::sending(true)))
            .unwrap();
        context_a.add_tab(None).unwrap();

        context_b.sync_remote();
        assert_eq!(context_b.session().tabs.len(), 2);
        // The local result survived the merge because its tab is still open.
        assert_eq!(context_b.session().results.len(), 1);
    }

    #[test]
    fn test_reopen_restores_tabs_without_ephemeral_state() {
        let storage = Arc::new(MemoryStorage::default());
        let hub = MemoryHub::default();
        let mut store = open_store(&storage, &hub);

        let id = store.add_tab(None).unwrap();
        store.set_result(id, Some(ResultPatch::sending(true))).unwrap();
        drop(store);

        let reopened = open_store(&storage, &hub);
        assert_eq!(reopened.session().tabs.len(), 1);
        assert_eq!(reopened.current(), Some(id));
        assert!(reopened.session().results.is_empty());
    }

    #[test]
    fn test_collection_removal_does_not_touch_tabs() {
        // Cross-store independence: removing the saved request from the
        // collection store must leave a tab still editing it.
        let storage = Arc::new(MemoryStorage::default());
        let hub = MemoryHub::default();

        let mut collections = crate::stores::CollectionStore::open(
            Arc::clone(&storage),
            &hub,
            quiver_domain::Forest::new(),
        )
        .unwrap();
        let mut tabs = open_store(&storage, &hub);

        let folder_id = collections
            .create_folder(&quiver_domain::Folder::new("Auth"), None)
            .unwrap();
        let request = Request::get("Login", "https://api.example.com/login");
        let request_id = collections.create_request(request.clone(), folder_id).unwrap();
        tabs.add_tab(Some(request)).unwrap();

        collections.remove_folder(folder_id).unwrap();
        assert!(collections.get_request(request_id).is_none());
        assert!(tabs.get_tab(request_id).is_some());
    }
}
