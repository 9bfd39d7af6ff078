//! Collection import boundary.
//!
//! Parses an exported forest document and validates it against the
//! data-model constraints. This is the one place validation runs; the
//! stores behind it assume their inputs are already well-formed. The
//! returned forest still carries the exported ids; handing it to
//! `CollectionStore::import_forest` regenerates every one of them.

use thiserror::Error;

use quiver_domain::{DomainError, Forest, validate};

use crate::serialization::{SerializationError, from_json};

/// Errors from parsing a collection export.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not valid JSON for a forest.
    #[error("import is not a valid collection export: {0}")]
    Parse(#[from] SerializationError),

    /// The document violates the data-model constraints.
    #[error("import rejected: {0}")]
    Invalid(#[from] DomainError),
}

/// Parses and validates an exported forest document.
///
/// # Errors
///
/// Returns an error when the document cannot be parsed or any folder
/// or request in it fails validation.
pub fn parse_forest(json: &str) -> Result<Forest, ImportError> {
    let forest: Forest = from_json(json)?;
    validate::validate_forest(&forest)?;
    Ok(forest)
}
