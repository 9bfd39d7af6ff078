//! Collection forest types and the pure tree repository

mod folder;
mod query;
pub mod tree;

pub use folder::{Folder, Forest};
pub use query::{FolderPatch, FolderQuery, RequestPatch, RequestQuery};
