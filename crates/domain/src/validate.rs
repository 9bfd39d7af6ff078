//! Validation of user- and import-supplied data.
//!
//! Runs at the boundary (import, form submission) only; the stores
//! assume their inputs already satisfy these constraints.

use std::sync::Arc;

use url::Url;

use crate::collection::Folder;
use crate::error::{DomainError, DomainResult};
use crate::request::{HeaderEntry, KeyValue, Request};

/// Maximum length of folder and request names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of keys and values in params and headers.
pub const MAX_ENTRY_LEN: usize = 100;

/// Checks a node name is 1..=100 characters.
///
/// # Errors
///
/// Returns [`DomainError::InvalidName`] when empty or too long.
pub fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Checks a request satisfies the data-model constraints.
///
/// # Errors
///
/// Returns the first violated constraint: name length, URL syntax, or
/// param/header entry length.
pub fn validate_request(request: &Request) -> DomainResult<()> {
    validate_name(&request.name)?;
    Url::parse(&request.url).map_err(|_| DomainError::InvalidUrl(request.url.clone()))?;
    for param in &request.params {
        validate_key_value(param)?;
    }
    for header in &request.headers {
        validate_header(header)?;
    }
    Ok(())
}

/// Checks a folder and everything below it.
///
/// # Errors
///
/// Returns the first violation found in pre-order.
pub fn validate_folder(folder: &Folder) -> DomainResult<()> {
    validate_name(&folder.name)?;
    for request in &folder.requests {
        validate_request(request)?;
    }
    for child in &folder.folders {
        validate_folder(child)?;
    }
    Ok(())
}

/// Checks every tree of a forest.
///
/// # Errors
///
/// Returns the first violation found in pre-order.
pub fn validate_forest(forest: &[Arc<Folder>]) -> DomainResult<()> {
    for folder in forest {
        validate_folder(folder)?;
    }
    Ok(())
}

fn validate_key_value(entry: &KeyValue) -> DomainResult<()> {
    if entry.key.chars().count() > MAX_ENTRY_LEN || entry.value.chars().count() > MAX_ENTRY_LEN {
        return Err(DomainError::InvalidEntry(entry.key.clone()));
    }
    Ok(())
}

fn validate_header(entry: &HeaderEntry) -> DomainResult<()> {
    if entry.key.chars().count() > MAX_ENTRY_LEN || entry.value.chars().count() > MAX_ENTRY_LEN {
        return Err(DomainError::InvalidEntry(entry.key.clone()));
    }
    Ok(())
}
