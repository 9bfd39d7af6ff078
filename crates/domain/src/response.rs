//! Response descriptor returned by the fetch collaborator.

use serde::{Deserialize, Serialize};

/// Everything the editor keeps about one completed HTTP exchange.
///
/// Produced by the fetch collaborator; the stores only carry and
/// display it, they never inspect wire-level framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseDescriptor {
    /// Whether the status was in the 200..=299 range
    pub ok: bool,
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Raw response bytes
    #[serde(default)]
    pub body: Vec<u8>,
    /// Response body decoded as text
    #[serde(default)]
    pub raw: String,
    /// Body parsed as JSON, when the response declared a JSON type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Wall-clock time the exchange took, in milliseconds
    pub time_ms: f64,
}

impl ResponseDescriptor {
    /// Returns the first header with the given name, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
