//! Quiver Application Layer
//!
//! Ports (durable storage, sync channel, fetch collaborator) and the
//! three session stores (collections, tabs, settings). Everything here
//! is I/O-free; adapters live in the infrastructure crate and are
//! injected explicitly.

pub mod error;
pub mod ports;
pub mod stores;

pub use error::{StoreError, StoreResult};
pub use stores::{CollectionStore, SettingsStore, SubscriberId, TabStore};
