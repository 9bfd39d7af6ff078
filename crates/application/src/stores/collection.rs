//! Collection store: the canonical forest of saved requests.

use std::sync::Arc;

use uuid::Uuid;

use quiver_domain::collection::tree;
use quiver_domain::{
    Folder, FolderPatch, FolderQuery, Forest, Request, RequestPatch, RequestQuery, generate_id,
};

use super::{SubscriberId, Subscribers};
use crate::error::StoreResult;
use crate::ports::{ProfileStorage, SyncChannel, SyncHub};

/// Storage key (and channel name) for the collection forest.
pub const COLLECTIONS_KEY: &str = "rest.collections";

/// Owns the canonical in-memory collection forest for one context.
///
/// Wraps the pure tree repository with persistence and cross-context
/// broadcast: every mutation applies the repository function, replaces
/// the in-memory forest, persists the result under
/// [`COLLECTIONS_KEY`] and publishes it on the equally named channel.
/// Contexts apply each other's messages in [`Self::sync_remote`].
pub struct CollectionStore<S, C> {
    storage: Arc<S>,
    channel: C,
    forest: Forest,
    subscribers: Subscribers<Forest>,
}

impl<S, C> CollectionStore<S, C>
where
    S: ProfileStorage,
    C: SyncChannel,
{
    /// Opens the store against the given storage and hub.
    ///
    /// When no durable state exists yet, `initial` is written once and
    /// adopted; malformed stored state falls back to `initial` without
    /// failing; otherwise the stored forest wins.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read or seeded.
    pub fn open<H>(storage: Arc<S>, hub: &H, initial: Forest) -> StoreResult<Self>
    where
        H: SyncHub<Channel = C>,
    {
        let channel = hub.channel(COLLECTIONS_KEY);
        let forest = match storage.read(COLLECTIONS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(%error, "stored collection forest is malformed, using defaults");
                initial
            }),
            None => {
                storage.write(COLLECTIONS_KEY, &serde_json::to_string(&initial)?)?;
                initial
            }
        };

        Ok(Self {
            storage,
            channel,
            forest,
            subscribers: Subscribers::new(),
        })
    }

    /// Returns the current forest.
    #[must_use]
    pub const fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Returns the folder with the given id, if present.
    #[must_use]
    pub fn get_folder(&self, id: Uuid) -> Option<Arc<Folder>> {
        tree::find_folder(&self.forest, &FolderQuery::by_id(id)).map(Arc::clone)
    }

    /// Returns the request with the given id, if present.
    #[must_use]
    pub fn get_request(&self, id: Uuid) -> Option<Arc<Request>> {
        tree::find_request(&self.forest, &RequestQuery::by_id(id)).map(Arc::clone)
    }

    /// Creates a folder under `parent_id`, or at the root when `None`.
    ///
    /// A fresh id is assigned and the new folder starts empty; only the
    /// name is taken from the argument. Returns the new id. A missing
    /// parent leaves the forest unchanged; callers are expected to
    /// have validated the parent exists.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn create_folder(&mut self, folder: &Folder, parent_id: Option<Uuid>) -> StoreResult<Uuid> {
        let parent = parent_id.map_or_else(FolderQuery::default, FolderQuery::by_id);
        let new_folder = Folder {
            id: generate_id(),
            name: folder.name.clone(),
            requests: Vec::new(),
            folders: Vec::new(),
        };
        let id = new_folder.id;
        tracing::debug!(%id, name = %new_folder.name, "creating folder");

        self.forest = tree::create_folder(&self.forest, &parent, new_folder);
        self.commit()?;
        Ok(id)
    }

    /// Appends a request to the folder with `parent_id`.
    ///
    /// The request is stored as given; its id is kept, so a tab
    /// snapshot can be saved under the id the tab already carries.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn create_request(&mut self, request: Request, parent_id: Uuid) -> StoreResult<Uuid> {
        let id = request.id;
        tracing::debug!(%id, name = %request.name, "creating request");

        self.forest = tree::create_request(&self.forest, &FolderQuery::by_id(parent_id), request);
        self.commit()?;
        Ok(id)
    }

    /// Replaces the fields of the folder with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn update_folder(&mut self, folder: Folder) -> StoreResult<()> {
        let query = FolderQuery::by_id(folder.id);
        self.forest = tree::update_folder(&self.forest, &query, &FolderPatch::from(folder));
        self.commit()
    }

    /// Replaces the fields of the request with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn update_request(&mut self, request: Request) -> StoreResult<()> {
        let query = RequestQuery::by_id(request.id);
        self.forest = tree::update_request(&self.forest, &query, &RequestPatch::from(request));
        self.commit()
    }

    /// Removes the folder with the given id, wherever it sits.
    ///
    /// Open tabs referencing requests inside the removed subtree are
    /// not touched; tab cleanup is the tab store's own concern.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn remove_folder(&mut self, id: Uuid) -> StoreResult<()> {
        self.forest = tree::remove_folder(&self.forest, &FolderQuery::by_id(id));
        self.commit()
    }

    /// Removes the request with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn remove_request(&mut self, id: Uuid) -> StoreResult<()> {
        self.forest = tree::remove_request(&self.forest, &RequestQuery::by_id(id));
        self.commit()
    }

    /// Appends an imported forest after regenerating every id in it.
    ///
    /// Returns the number of imported root folders.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn import_forest(&mut self, forest: &[Arc<Folder>]) -> StoreResult<usize> {
        let imported = tree::reassign_ids(forest);
        let count = imported.len();
        tracing::debug!(count, "importing collection forest");

        self.forest.extend(imported);
        self.commit()?;
        Ok(count)
    }

    /// Returns a trimmed view of the forest for search-as-you-type.
    #[must_use]
    pub fn filter(&self, search: &str) -> Forest {
        tree::filter_tree(&self.forest, search)
    }

    /// Applies forests published by other contexts.
    ///
    /// Last writer wins: each pending message overwrites the in-memory
    /// forest. Nothing is persisted or re-broadcast; the sender
    /// already did both, and echoing would ping-pong forever.
    pub fn sync_remote(&mut self) {
        let mut merged = false;
        while let Some(payload) = self.channel.try_recv() {
            match serde_json::from_value::<Forest>(payload) {
                Ok(forest) => {
                    self.forest = forest;
                    merged = true;
                }
                Err(error) => {
                    tracing::warn!(%error, "ignoring malformed collection broadcast");
                }
            }
        }
        if merged {
            self.subscribers.notify(&self.forest);
        }
    }

    /// Registers a subscriber receiving the forest after every change.
    pub fn subscribe(&mut self, callback: impl Fn(&Forest) + 'static) -> SubscriberId {
        self.subscribers.add(Box::new(callback))
    }

    /// Detaches a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.remove(id);
    }

    /// Notify, then persist, then broadcast.
    ///
    /// Memory is already updated when this runs, so a failure here
    /// loses at most a broadcast, never freshness.
    fn commit(&mut self) -> StoreResult<()> {
        self.subscribers.notify(&self.forest);
        let payload = serde_json::to_value(&self.forest)?;
        self.storage.write(COLLECTIONS_KEY, &payload.to_string())?;
        self.channel.publish(payload);
        Ok(())
    }
}
