//! Manager actions and state transitions for the URL-owned slice.

use std::rc::Rc;

use crate::{
    decoder::DecodedUrl,
    model::{CurrentItem, ManagerState},
    query::QueryParams,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_manager`].
pub enum ManagerAction {
    /// Merge the boot decode: layout/UI patches, selected panel, route fields and custom params.
    ApplyDecodedUrl(DecodedUrl),
    /// Refresh route fields after an upstream location change.
    ///
    /// Layout and UI patches are boot-only and are not re-applied. Custom params stay as stored:
    /// the writer rewrites the address bar with a single param and records it through
    /// [`ManagerAction::SetCustomQueryParams`].
    LocationChanged(DecodedUrl),
    /// Replace the custom query params.
    SetCustomQueryParams(Rc<QueryParams>),
    /// Replace the current item.
    SetCurrentItem(Option<CurrentItem>),
    /// Record whether release notes should open on launch.
    SetReleaseNotesPending(bool),
}

fn apply_route(state: &mut ManagerState, decoded: DecodedUrl) {
    state.location = decoded.location;
    state.path = decoded.path;
    state.url = decoded.url;
    state.view_mode = decoded.view_mode;
    state.ref_id = decoded.ref_id;
    state.item_id = decoded.item_id;
}

/// Applies `action` to `state`.
pub fn reduce_manager(state: &mut ManagerState, action: ManagerAction) {
    match action {
        ManagerAction::ApplyDecodedUrl(decoded) => {
            decoded.layout.apply_to(&mut state.layout);
            decoded.ui.apply_to(&mut state.ui);
            if decoded.selected_panel.is_some() {
                state.selected_panel = decoded.selected_panel.clone();
            }
            state.custom_query_params = Rc::clone(&decoded.custom_query_params);
            apply_route(state, decoded);
        }
        ManagerAction::LocationChanged(decoded) => apply_route(state, decoded),
        ManagerAction::SetCustomQueryParams(params) => {
            state.custom_query_params = params;
        }
        ManagerAction::SetCurrentItem(item) => {
            state.current_item = item;
        }
        ManagerAction::SetReleaseNotesPending(pending) => {
            state.show_release_notes_on_launch = pending;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use preview_host::RouterLocation;

    use super::*;
    use crate::{decoder::UrlDecoder, model::PanelPosition, route::RouteState};

    fn decoded(decoder: &mut UrlDecoder, href: &str) -> DecodedUrl {
        decoder.decode(&RouteState::from_location(&RouterLocation::from_href(href)))
    }

    #[test]
    fn boot_decode_merges_layout_ui_and_route() {
        let mut decoder = UrlDecoder::default();
        let mut state = ManagerState::default();
        reduce_manager(
            &mut state,
            ManagerAction::ApplyDecodedUrl(decoded(
                &mut decoder,
                "/?path=/story/a--b&panel=right&shortcuts=0&addonPanel=actions&foo=1",
            )),
        );

        assert_eq!(state.layout.panel_position, PanelPosition::Right);
        assert!(state.layout.show_nav);
        assert!(!state.ui.enable_shortcuts);
        assert_eq!(state.selected_panel.as_deref(), Some("actions"));
        assert_eq!(state.view_mode.as_deref(), Some("story"));
        assert_eq!(state.item_id.as_deref(), Some("a--b"));
        assert_eq!(
            state.custom_query_params.get("foo"),
            Some(&Some("1".to_string()))
        );
    }

    #[test]
    fn location_change_leaves_layout_alone() {
        let mut decoder = UrlDecoder::default();
        let mut state = ManagerState::default();
        reduce_manager(
            &mut state,
            ManagerAction::ApplyDecodedUrl(decoded(&mut decoder, "/?full=1")),
        );
        reduce_manager(
            &mut state,
            ManagerAction::LocationChanged(decoded(
                &mut decoder,
                "/?path=/docs/a--b&nav=0&full=0",
            )),
        );

        assert!(state.layout.is_fullscreen);
        assert!(state.layout.show_nav);
        assert_eq!(state.view_mode.as_deref(), Some("docs"));
        assert_eq!(state.path, "/docs/a--b");
    }

    #[test]
    fn location_change_keeps_stored_custom_params() {
        let mut decoder = UrlDecoder::default();
        let mut state = ManagerState::default();
        reduce_manager(
            &mut state,
            ManagerAction::ApplyDecodedUrl(decoded(&mut decoder, "/?path=/story/a--b&foo=bar")),
        );
        let stored = Rc::clone(&state.custom_query_params);

        reduce_manager(
            &mut state,
            ManagerAction::LocationChanged(decoded(
                &mut decoder,
                "/?path=/story/a--b&globals=theme:dark",
            )),
        );

        assert!(Rc::ptr_eq(&stored, &state.custom_query_params));
        assert_eq!(
            state.custom_query_params.get("foo"),
            Some(&Some("bar".to_string()))
        );
        assert!(!state.custom_query_params.contains_key("globals"));
    }
}
