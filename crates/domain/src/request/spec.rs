//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{HeaderEntry, KeyValue, Method, RequestBody};
use crate::id::generate_id;

/// The URL a blank request points at, so a fresh tab can be sent as-is.
pub const DEFAULT_REQUEST_URL: &str = "https://jsonplaceholder.typicode.com/todos/1";

/// The name given to nodes the user has not renamed yet.
pub const DEFAULT_NAME: &str = "Untitled";

/// A saved description of one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier within the collection forest
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// Target URL
    pub url: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Query parameters
    #[serde(default)]
    pub params: Vec<KeyValue>,
    /// Request headers
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl Request {
    /// Creates a new request with a fresh id and the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            url: DEFAULT_REQUEST_URL.to_string(),
            method: Method::default(),
            params: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::none(),
        }
    }

    /// Creates a GET request with the given name and URL.
    #[must_use]
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::new(name)
        }
    }

    /// Validates the URL and returns the parsed version if valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    /// Returns an iterator over params that are applied on send.
    pub fn active_params(&self) -> impl Iterator<Item = &KeyValue> {
        self.params.iter().filter(|p| p.active)
    }

    /// Returns an iterator over headers that are applied on send.
    pub fn active_headers(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.headers.iter().filter(|h| h.active)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}
