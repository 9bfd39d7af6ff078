//! Broadcast hub over tokio's broadcast channels.
//!
//! One hub per profile plays the role the browser's named broadcast
//! channels play for same-origin tabs: every context that asks for a
//! channel of the same name sees every other context's messages, in
//! publish order, and never its own.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use quiver_application::ports::{SyncChannel, SyncHub};

/// Buffered messages per channel before the slowest handle starts
/// losing the oldest ones (last-writer-wins makes that loss benign).
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct Envelope {
    origin: Uuid,
    payload: Value,
}

/// Registry of named broadcast channels shared by all contexts of one
/// profile.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    senders: Mutex<HashMap<String, broadcast::Sender<Envelope>>>,
}

impl BroadcastHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncHub for BroadcastHub {
    type Channel = BroadcastChannel;

    fn channel(&self, name: &str) -> BroadcastChannel {
        let mut senders = match self.senders.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let sender = senders
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);

        BroadcastChannel {
            origin: Uuid::new_v4(),
            receiver: sender.subscribe(),
            sender: sender.clone(),
        }
    }
}

/// One context's handle onto a named channel.
///
/// Every handle carries its own origin id; messages are enveloped with
/// the sender's origin so `try_recv` can drop the handle's own
/// publishes; a context never receives its own messages.
#[derive(Debug)]
pub struct BroadcastChannel {
    origin: Uuid,
    sender: broadcast::Sender<Envelope>,
    receiver: broadcast::Receiver<Envelope>,
}

impl SyncChannel for BroadcastChannel {
    fn publish(&self, payload: Value) {
        // A send with no other subscribers is not a failure.
        let _ = self.sender.send(Envelope {
            origin: self.origin,
            payload,
        });
    }

    fn try_recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.origin == self.origin => {}
                Ok(envelope) => return Some(envelope.payload),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "broadcast receiver lagged, skipping to newest");
                }
                Err(_) => return None,
            }
        }
    }
}
