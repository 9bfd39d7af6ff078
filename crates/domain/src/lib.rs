//! Quiver Domain - Core business types
//!
//! This crate defines the domain model for the Quiver API client:
//! the collection forest, requests, editing tabs, user settings and
//! the pure tree repository operating over them.
//! All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;
pub mod tab;
pub mod validate;

pub use collection::{Folder, FolderPatch, FolderQuery, Forest, RequestPatch, RequestQuery};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use request::{ContentType, HeaderEntry, KeyValue, Method, Request, RequestBody};
pub use response::ResponseDescriptor;
pub use settings::{
    AccentColor, BackgroundColor, Layout, Navigation, SettingsPatch, Sidebar, SidebarPosition,
    UserSettings,
};
pub use tab::{EditorPane, ResultPatch, Tab, TabResult, TabSession, TabSnapshot};
