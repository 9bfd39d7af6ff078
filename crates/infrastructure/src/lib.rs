//! Quiver Infrastructure - Adapters
//!
//! Implementations of the application ports (file-backed profile
//! storage, the in-process broadcast hub, the reqwest-based fetch
//! collaborator) plus the import/export boundary and the
//! deterministic JSON helpers shared between them.

pub mod export;
pub mod http;
pub mod import;
pub mod persistence;
pub mod serialization;
pub mod sync;

pub use export::export_forest;
pub use http::ReqwestFetcher;
pub use import::{ImportError, parse_forest};
pub use persistence::FileProfileStorage;
pub use sync::{BroadcastChannel, BroadcastHub};
