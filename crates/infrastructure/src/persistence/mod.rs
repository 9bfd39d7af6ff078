//! Durable storage adapters

mod profile_storage;

pub use profile_storage::FileProfileStorage;
