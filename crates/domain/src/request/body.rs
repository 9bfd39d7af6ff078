//! HTTP request body types

use serde::{Deserialize, Serialize};

/// Content types offered by the body editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// `application/json`
    #[serde(rename = "application/json")]
    Json,
    /// `application/xml`
    #[serde(rename = "application/xml")]
    Xml,
    /// `application/x-www-form-urlencoded`
    #[serde(rename = "application/x-www-form-urlencoded")]
    UrlEncoded,
    /// `text/html`
    #[serde(rename = "text/html")]
    Html,
    /// `text/plain`
    #[serde(rename = "text/plain")]
    Text,
}

impl ContentType {
    /// Returns the MIME string sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::Html => "text/html",
            Self::Text => "text/plain",
        }
    }
}

/// Request body with its declared content type.
///
/// Both fields default to `None`: a request starts without a body and
/// the editor only materializes one once the user picks a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The body content, if any
    pub body: Option<String>,
    /// The declared content type, if any
    #[serde(rename = "contentType")]
    pub content_type: Option<ContentType>,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            body: None,
            content_type: None,
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            body: Some(content.into()),
            content_type: Some(ContentType::Json),
        }
    }

    /// Returns whether there is no content to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_none()
    }
}
