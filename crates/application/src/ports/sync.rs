//! Cross-context broadcast port

use serde_json::Value;

/// A handle onto one named broadcast channel.
///
/// Messages are the same JSON payloads the sender writes to durable
/// storage. Delivery is FIFO per channel, and a handle never receives
/// its own publishes; the sender has already applied and persisted the
/// state it is announcing.
pub trait SyncChannel {
    /// Publishes a payload to every other handle on this channel.
    ///
    /// Fire-and-forget: publishing with no listeners is not an error.
    fn publish(&self, payload: Value);

    /// Returns the next pending message from other handles, if any.
    fn try_recv(&mut self) -> Option<Value>;
}

/// Factory for broadcast channels, one per storage key.
///
/// All contexts sharing a hub (the analogue of browser tabs sharing a
/// profile) see each other's messages on equally named channels.
pub trait SyncHub {
    /// The channel handle type produced by this hub.
    type Channel: SyncChannel;

    /// Opens a handle onto the channel with the given name.
    fn channel(&self, name: &str) -> Self::Channel;
}
