//! Collection export boundary.

use std::sync::Arc;

use quiver_domain::Folder;

use crate::serialization::{SerializationError, to_json_stable};

/// Serializes the forest to a deterministic JSON document.
///
/// The export keeps the original ids; the import side regenerates
/// them, so a document can round-trip into the same or another
/// profile without colliding with live data.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn export_forest(forest: &[Arc<Folder>]) -> Result<String, SerializationError> {
    to_json_stable(&forest)
}
