//! Boot-time query decoding into manager state patches.
//!
//! Decoding is tolerant: unknown values leave their field unset and nothing here can fail.
//! Recognized params:
//! - `full`: `true`/`1` shows fullscreen
//! - `panel`: `right`/`bottom` docks the addon panel, `false`/`0` hides it
//! - `nav`: `false`/`0` hides the navigation pane
//! - `shortcuts`: `false`/`0` disables keyboard shortcuts
//! - `addonPanel`: selects an addon panel by id
//!
//! plus the retired aliases in [`crate::deprecations`]. Everything else is forwarded to the
//! preview frame as custom query params.

use std::rc::Rc;

use preview_host::RouterLocation;

use crate::{
    deprecations::{apply_legacy_layout_params, legacy_item_id},
    model::{LayoutPatch, PanelPosition, UiPatch},
    query::QueryParams,
    route::RouteState,
    warnings::OnceWarnings,
};

/// Query keys consumed by the decoder; they never reach the custom query params.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "full",
    "panel",
    "nav",
    "shortcuts",
    "addonPanel",
    "addons",
    "panelRight",
    "stories",
    "selectedKind",
    "selectedStory",
    "path",
];

#[derive(Debug, Clone, PartialEq)]
/// Result of decoding one location.
pub struct DecodedUrl {
    pub view_mode: Option<String>,
    pub layout: LayoutPatch,
    pub ui: UiPatch,
    pub selected_panel: Option<String>,
    pub location: RouterLocation,
    pub path: String,
    pub url: String,
    pub ref_id: Option<String>,
    pub item_id: Option<String>,
    pub custom_query_params: Rc<QueryParams>,
}

fn is_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "1"))
}

fn is_disabled(value: Option<&str>) -> bool {
    matches!(value, Some("false" | "0"))
}

#[derive(Debug, Default)]
/// Query decoder carrying the custom-param memo and the deprecation warning log.
pub struct UrlDecoder {
    previous_custom: Option<Rc<QueryParams>>,
    warnings: OnceWarnings,
}

impl UrlDecoder {
    /// Creates a decoder that reports deprecations through `warnings`.
    pub fn new(warnings: OnceWarnings) -> Self {
        Self {
            previous_custom: None,
            warnings,
        }
    }

    /// Seeds the memo with custom params already held by the host, so an unchanged decode
    /// hands back the host's own allocation.
    pub fn with_previous(mut self, previous: Rc<QueryParams>) -> Self {
        self.previous_custom = Some(previous);
        self
    }

    /// Returns the deprecation warning log.
    pub fn warnings(&self) -> &OnceWarnings {
        &self.warnings
    }

    /// Decodes `route` into layout/UI patches, the item id and custom query params.
    ///
    /// Custom params are the same allocation as the previous decode's whenever their content is
    /// unchanged.
    pub fn decode(&mut self, route: &RouteState) -> DecodedUrl {
        let query = &route.query;
        let value = |key: &str| query.get(key).and_then(|value| value.as_deref());

        let mut layout = LayoutPatch::default();
        let mut ui = UiPatch::default();

        if is_enabled(value("full")) {
            layout.is_fullscreen = Some(true);
        }
        if let Some(panel) = value("panel") {
            if let Some(position) = PanelPosition::parse(panel) {
                layout.panel_position = Some(position);
            } else if is_disabled(Some(panel)) {
                layout.show_panel = Some(false);
            }
        }
        if is_disabled(value("nav")) {
            layout.show_nav = Some(false);
        }
        if is_disabled(value("shortcuts")) {
            ui.enable_shortcuts = Some(false);
        }
        let selected_panel = value("addonPanel")
            .filter(|panel| !panel.is_empty())
            .map(str::to_string);

        apply_legacy_layout_params(query, &mut layout, &self.warnings);

        let item_id = route
            .item_id
            .clone()
            .or_else(|| legacy_item_id(query, &self.warnings));

        let other: QueryParams = query
            .iter()
            .filter(|(key, _)| !RECOGNIZED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let custom_query_params = match &self.previous_custom {
            Some(previous) if **previous == other => Rc::clone(previous),
            _ => Rc::new(other),
        };
        self.previous_custom = Some(Rc::clone(&custom_query_params));

        DecodedUrl {
            view_mode: route.view_mode.clone(),
            layout,
            ui,
            selected_panel,
            location: route.location.clone(),
            path: route.path.clone(),
            url: route.url.clone(),
            ref_id: route.ref_id.clone(),
            item_id,
            custom_query_params,
        }
    }
}
