//! Manager state slices touched by URL sync.

use std::rc::Rc;

use preview_host::RouterLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::QueryParams;

/// Argument or global values keyed by name.
pub type Args = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Docking position of the addon panel.
pub enum PanelPosition {
    /// Panel docked below the preview.
    #[default]
    Bottom,
    /// Panel docked to the right of the preview.
    Right,
}

impl PanelPosition {
    /// Stable query-string token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Right => "right",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "bottom" => Some(Self::Bottom),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Manager chrome layout.
pub struct Layout {
    pub is_fullscreen: bool,
    pub show_panel: bool,
    pub show_nav: bool,
    pub panel_position: PanelPosition,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            is_fullscreen: false,
            show_panel: true,
            show_nav: true,
            panel_position: PanelPosition::Bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Manager UI preferences.
pub struct UiSettings {
    pub enable_shortcuts: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            enable_shortcuts: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Partial [`Layout`]; only fields present in the query are set.
pub struct LayoutPatch {
    pub is_fullscreen: Option<bool>,
    pub panel_position: Option<PanelPosition>,
    pub show_panel: Option<bool>,
    pub show_nav: Option<bool>,
}

impl LayoutPatch {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites the fields of `layout` that this patch sets.
    pub fn apply_to(&self, layout: &mut Layout) {
        if let Some(value) = self.is_fullscreen {
            layout.is_fullscreen = value;
        }
        if let Some(value) = self.panel_position {
            layout.panel_position = value;
        }
        if let Some(value) = self.show_panel {
            layout.show_panel = value;
        }
        if let Some(value) = self.show_nav {
            layout.show_nav = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Partial [`UiSettings`].
pub struct UiPatch {
    pub enable_shortcuts: Option<bool>,
}

impl UiPatch {
    /// Overwrites the fields of `ui` that this patch sets.
    pub fn apply_to(&self, ui: &mut UiSettings) {
        if let Some(value) = self.enable_shortcuts {
            ui.enable_shortcuts = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Initial and current argument values of an item that exposes argument state.
pub struct ItemArgs {
    pub initial_args: Args,
    pub args: Args,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The item currently shown by the manager.
pub struct CurrentItem {
    pub id: String,
    /// `None` for entries without argument state (for example documentation pages).
    pub args: Option<ItemArgs>,
}

#[derive(Debug, Clone, PartialEq)]
/// Read-only URL snapshot exposed to the rest of the manager.
pub struct UrlState {
    pub query_params: Rc<QueryParams>,
    pub path: String,
    pub view_mode: Option<String>,
    pub item_id: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Host manager state slice owned or read by URL sync.
pub struct ManagerState {
    pub location: RouterLocation,
    pub path: String,
    pub view_mode: Option<String>,
    pub item_id: Option<String>,
    pub ref_id: Option<String>,
    pub url: String,
    pub custom_query_params: Rc<QueryParams>,
    pub layout: Layout,
    pub ui: UiSettings,
    pub selected_panel: Option<String>,
    pub current_item: Option<CurrentItem>,
    pub show_release_notes_on_launch: bool,
}

impl Default for ManagerState {
    fn default() -> Self {
        Self {
            location: RouterLocation::from_href("/"),
            path: "/".to_string(),
            view_mode: None,
            item_id: None,
            ref_id: None,
            url: "/".to_string(),
            custom_query_params: Rc::new(QueryParams::new()),
            layout: Layout::default(),
            ui: UiSettings::default(),
            selected_panel: None,
            current_item: None,
            show_release_notes_on_launch: false,
        }
    }
}

impl ManagerState {
    /// Returns the shareable URL snapshot of this state.
    pub fn url_state(&self) -> UrlState {
        UrlState {
            query_params: Rc::clone(&self.custom_query_params),
            path: self.path.clone(),
            view_mode: self.view_mode.clone(),
            item_id: self.item_id.clone(),
            url: self.url.clone(),
        }
    }
}
