//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and the
//! outside world. Each port is a trait implemented by an adapter in
//! the infrastructure crate and injected where it is needed.

mod fetch;
mod storage;
mod sync;

pub use fetch::{FetchError, Fetcher};
pub use storage::{ProfileStorage, StorageError};
pub use sync::{SyncChannel, SyncHub};
