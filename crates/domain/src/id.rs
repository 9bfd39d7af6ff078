//! ID generation utilities.

use uuid::Uuid;

/// Generates a new random UUID.
///
/// This is the standard ID format for all Quiver entities: folders,
/// requests and tabs. The 128-bit random token makes collisions
/// effectively impossible at the cardinality a single profile holds.
#[must_use]
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}
