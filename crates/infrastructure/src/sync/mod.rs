//! Cross-context broadcast adapters

mod broadcast_hub;

pub use broadcast_hub::{BroadcastChannel, BroadcastHub};
