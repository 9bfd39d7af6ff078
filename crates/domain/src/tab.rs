//! Editing-session tab types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_id;
use crate::request::Request;
use crate::response::ResponseDescriptor;

/// The editor pane currently shown inside a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorPane {
    /// Query parameter editor (default)
    #[default]
    Params,
    /// Body editor
    Body,
    /// Header editor
    Headers,
    /// Authorization editor
    Auth,
}

/// An open editing session wrapping one request snapshot.
///
/// `dirty` marks unsaved changes relative to the persisted request with
/// the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Tab identifier; equals the wrapped request's id when the tab was
    /// opened from a saved request
    pub id: Uuid,
    /// The request snapshot being edited
    pub context: Request,
    /// Active editor pane
    #[serde(rename = "currentTab", default)]
    pub current_tab: EditorPane,
    /// Whether the snapshot has unsaved edits
    #[serde(default)]
    pub dirty: bool,
}

impl Tab {
    /// Wraps a saved request for editing; the tab takes the request's id.
    #[must_use]
    pub const fn for_request(context: Request) -> Self {
        Self {
            id: context.id,
            context,
            current_tab: EditorPane::Params,
            dirty: false,
        }
    }

    /// Creates a blank tab around a default request sharing the tab id.
    #[must_use]
    pub fn blank() -> Self {
        let id = generate_id();
        Self {
            id,
            context: Request {
                id,
                ..Request::default()
            },
            current_tab: EditorPane::Params,
            dirty: false,
        }
    }
}

/// The last exchange outcome attached to a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabResult {
    /// The tab this result belongs to
    pub id: Uuid,
    /// The response descriptor, absent while nothing has completed yet
    #[serde(default)]
    pub response: Option<ResponseDescriptor>,
    /// Whether a request for this tab is currently in flight
    #[serde(default)]
    pub sending: bool,
}

/// Partial update for a tab's result entry.
#[derive(Debug, Clone, Default)]
pub struct ResultPatch {
    /// New response descriptor
    pub response: Option<ResponseDescriptor>,
    /// New in-flight flag
    pub sending: Option<bool>,
}

impl ResultPatch {
    /// Patch marking the tab as sending.
    #[must_use]
    pub const fn sending(flag: bool) -> Self {
        Self {
            response: None,
            sending: Some(flag),
        }
    }

    /// Patch recording a completed response.
    #[must_use]
    pub const fn completed(response: ResponseDescriptor) -> Self {
        Self {
            response: Some(response),
            sending: Some(false),
        }
    }
}

/// Full in-memory tab-session state.
///
/// Only `tabs` and `current` travel to durable storage and across
/// contexts (see [`TabSnapshot`]); `tainted` and `results` describe
/// local editing and network state and stay in this context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabSession {
    /// Open tabs in display order
    #[serde(default)]
    pub tabs: Vec<Tab>,
    /// Id of the focused tab, if any
    #[serde(default)]
    pub current: Option<Uuid>,
    /// Tabs whose underlying saved request changed externally
    #[serde(default)]
    pub tainted: Vec<Uuid>,
    /// Per-tab exchange outcomes
    #[serde(default)]
    pub results: Vec<TabResult>,
}

impl TabSession {
    /// Returns the tab with the given id, if open.
    #[must_use]
    pub fn tab(&self, id: Uuid) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Returns the persisted subset of this session.
    #[must_use]
    pub fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            tabs: self.tabs.clone(),
            current: self.current,
        }
    }
}

/// The persisted and broadcast subset of [`TabSession`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabSnapshot {
    /// Open tabs in display order
    #[serde(default)]
    pub tabs: Vec<Tab>,
    /// Id of the focused tab, if any
    #[serde(default)]
    pub current: Option<Uuid>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tab_for_request_takes_request_id() {
        let request = Request::new("Login");
        let id = request.id;
        let tab = Tab::for_request(request);
        assert_eq!(tab.id, id);
        assert_eq!(tab.current_tab, EditorPane::Params);
        assert!(!tab.dirty);
    }

    #[test]
    fn test_blank_tab_shares_id_with_context() {
        let tab = Tab::blank();
        assert_eq!(tab.id, tab.context.id);
        assert_eq!(tab.context.name, "Untitled");
    }

    #[test]
    fn test_snapshot_drops_ephemeral_fields() {
        let tab = Tab::blank();
        let session = TabSession {
            current: Some(tab.id),
            tainted: vec![tab.id],
            results: vec![TabResult {
                id: tab.id,
                response: None,
                sending: true,
            }],
            tabs: vec![tab],
        };

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert!(json.get("tainted").is_none());
        assert!(json.get("results").is_none());
        assert_eq!(json["tabs"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_pane_serializes_lowercase() {
        let json = serde_json::to_string(&EditorPane::Headers).unwrap();
        assert_eq!(json, "\"headers\"");
    }
}
