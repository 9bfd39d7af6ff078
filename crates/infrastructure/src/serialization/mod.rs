//! Serialization helpers

mod json;

pub use json::{SerializationError, from_json, to_json_stable};
