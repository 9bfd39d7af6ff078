//! Key-value entry types for params and headers

use serde::{Deserialize, Serialize};

/// A query parameter key-value pair.
///
/// Supports enable/disable without deletion for editor convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// The entry key
    pub key: String,
    /// The entry value
    pub value: String,
    /// Whether this entry is applied when the request is sent
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl KeyValue {
    /// Creates a new active entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            active: true,
        }
    }

    /// Creates a disabled entry.
    #[must_use]
    pub fn inactive(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            active: false,
        }
    }
}

impl Default for KeyValue {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// A header entry.
///
/// Same shape as [`KeyValue`] plus an override marker: when set, the
/// user-supplied value replaces a header the client would otherwise
/// derive itself (e.g. `Content-Type` from the body type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// The header name
    pub key: String,
    /// The header value
    pub value: String,
    /// Whether this header is applied when the request is sent
    #[serde(default = "default_active")]
    pub active: bool,
    /// Whether this header replaces a derived header of the same name
    #[serde(rename = "override", default)]
    pub overwrite: bool,
}

impl HeaderEntry {
    /// Creates a new active header entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            active: true,
            overwrite: false,
        }
    }

    /// Marks this header as overriding a derived header.
    #[must_use]
    pub const fn overriding(mut self) -> Self {
        self.overwrite = true;
        self
    }
}
