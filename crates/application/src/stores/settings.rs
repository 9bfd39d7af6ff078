//! Settings store: small key-value preferences.

use std::sync::Arc;

use quiver_domain::{SettingsPatch, UserSettings};

use super::{SubscriberId, Subscribers};
use crate::error::StoreResult;
use crate::ports::{ProfileStorage, SyncChannel, SyncHub};

/// Storage key (and channel name) for user settings.
pub const SETTINGS_KEY: &str = "settings";

/// Owns the user preferences for one context.
///
/// Structurally a sibling of the collection and tab stores: same
/// seeding, same mutate → notify → persist → broadcast discipline,
/// same last-writer-wins merge of remote messages.
pub struct SettingsStore<S, C> {
    storage: Arc<S>,
    channel: C,
    settings: UserSettings,
    subscribers: Subscribers<UserSettings>,
}

impl<S, C> SettingsStore<S, C>
where
    S: ProfileStorage,
    C: SyncChannel,
{
    /// Opens the store against the given storage and hub.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read or seeded.
    pub fn open<H>(storage: Arc<S>, hub: &H, initial: UserSettings) -> StoreResult<Self>
    where
        H: SyncHub<Channel = C>,
    {
        let channel = hub.channel(SETTINGS_KEY);
        let settings = match storage.read(SETTINGS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(%error, "stored settings are malformed, using defaults");
                initial
            }),
            None => {
                storage.write(SETTINGS_KEY, &serde_json::to_string(&initial)?)?;
                initial
            }
        };

        Ok(Self {
            storage,
            channel,
            settings,
            subscribers: Subscribers::new(),
        })
    }

    /// Returns the current settings.
    #[must_use]
    pub const fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Shallow-merges the patch and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    pub fn save(&mut self, patch: &SettingsPatch) -> StoreResult<()> {
        self.settings = patch.apply(&self.settings);
        self.commit()
    }

    /// Applies settings published by other contexts, last writer wins.
    pub fn sync_remote(&mut self) {
        let mut merged = false;
        while let Some(payload) = self.channel.try_recv() {
            match serde_json::from_value::<UserSettings>(payload) {
                Ok(settings) => {
                    self.settings = settings;
                    merged = true;
                }
                Err(error) => {
                    tracing::warn!(%error, "ignoring malformed settings broadcast");
                }
            }
        }
        if merged {
            self.subscribers.notify(&self.settings);
        }
    }

    /// Registers a subscriber receiving settings after every change.
    pub fn subscribe(&mut self, callback: impl Fn(&UserSettings) + 'static) -> SubscriberId {
        self.subscribers.add(Box::new(callback))
    }

    /// Detaches a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.remove(id);
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.subscribers.notify(&self.settings);
        let payload = serde_json::to_value(&self.settings)?;
        self.storage.write(SETTINGS_KEY, &payload.to_string())?;
        self.channel.publish(payload);
        Ok(())
    }
}
