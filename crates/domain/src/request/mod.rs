//! HTTP request domain types

mod body;
mod entry;
mod method;
mod spec;

pub use body::{ContentType, RequestBody};
pub use entry::{HeaderEntry, KeyValue};
pub use method::Method;
pub use spec::{DEFAULT_NAME, DEFAULT_REQUEST_URL, Request};
