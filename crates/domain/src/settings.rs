//! User settings domain model.

use serde::{Deserialize, Serialize};

/// Background theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    /// Follow the system preference (default)
    #[default]
    System,
    /// Light background
    Light,
    /// Dark background
    Dark,
    /// Pure black background
    Black,
}

/// Accent color applied to interactive elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum AccentColor {
    Green,
    Teal,
    Blue,
    Indigo,
    Purple,
    Yellow,
    #[default]
    Orange,
    Red,
    Pink,
}

/// Split direction of the request/response panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Panes side by side
    Horizontal,
    /// Panes stacked (default)
    #[default]
    Vertical,
}

/// Whether the main navigation is collapsed to icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    /// Icons only (default)
    #[default]
    Collapse,
    /// Icons with labels
    Expand,
}

/// Sidebar visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sidebar {
    /// Sidebar shown (default)
    #[default]
    Open,
    /// Sidebar hidden
    Closed,
}

/// Which edge the sidebar docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    /// Docked left
    Left,
    /// Docked right (default)
    #[default]
    Right,
}

/// User preferences for the client.
///
/// Every field carries a serde default so documents persisted by older
/// versions deep-merge with current defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Background theme
    #[serde(default)]
    pub background_color: BackgroundColor,
    /// Accent color
    #[serde(default)]
    pub accent_color: AccentColor,
    /// Pane layout
    #[serde(default)]
    pub layout: Layout,
    /// Navigation density
    #[serde(default)]
    pub navigation: Navigation,
    /// Sidebar visibility
    #[serde(default)]
    pub sidebar: Sidebar,
    /// Sidebar docking edge
    #[serde(default)]
    pub sidebar_position: SidebarPosition,
    /// Whether long editor lines wrap
    #[serde(default)]
    pub line_wrapping: bool,
}

/// Partial update for [`UserSettings`]; supplied fields win.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    /// New background theme
    pub background_color: Option<BackgroundColor>,
    /// New accent color
    pub accent_color: Option<AccentColor>,
    /// New pane layout
    pub layout: Option<Layout>,
    /// New navigation density
    pub navigation: Option<Navigation>,
    /// New sidebar visibility
    pub sidebar: Option<Sidebar>,
    /// New sidebar docking edge
    pub sidebar_position: Option<SidebarPosition>,
    /// New line wrapping flag
    pub line_wrapping: Option<bool>,
}

impl SettingsPatch {
    /// Applies the patch, producing merged settings.
    #[must_use]
    pub fn apply(&self, settings: &UserSettings) -> UserSettings {
        UserSettings {
            background_color: self
                .background_color
                .unwrap_or(settings.background_color),
            accent_color: self.accent_color.unwrap_or(settings.accent_color),
            layout: self.layout.unwrap_or(settings.layout),
            navigation: self.navigation.unwrap_or(settings.navigation),
            sidebar: self.sidebar.unwrap_or(settings.sidebar),
            sidebar_position: self.sidebar_position.unwrap_or(settings.sidebar_position),
            line_wrapping: self.line_wrapping.unwrap_or(settings.line_wrapping),
        }
    }
}
