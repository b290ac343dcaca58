//! Routed view state carried by the `path` query param.

use std::sync::LazyLock;

use preview_host::RouterLocation;
use regex::Regex;

use crate::query::{parse_query, stringify_query, QueryParams};

static SPLIT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+)/(?:(.*)_)?([^/]+)?").expect("valid path regex"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// View mode, composition ref and item id encoded in a routed path.
pub struct ParsedPath {
    pub view_mode: Option<String>,
    pub ref_id: Option<String>,
    pub item_id: Option<String>,
}

/// Splits `/<viewMode>/[<refId>_]<itemId>` after lowercasing. Unmatched paths yield all `None`.
pub fn parse_path(path: &str) -> ParsedPath {
    let lowered = path.to_lowercase();
    let Some(captures) = SPLIT_PATH.captures(&lowered) else {
        return ParsedPath::default();
    };
    let group = |index: usize| captures.get(index).map(|m| m.as_str().to_string());
    ParsedPath {
        view_mode: group(1),
        ref_id: group(2),
        item_id: group(3),
    }
}

/// Builds the in-app navigation target for a routed path (`?path=<path>`).
///
/// `path` may carry further `&key=value` params after the route itself.
pub fn query_path(path: &str) -> String {
    format!("?path={path}")
}

/// Builds the embedded preview frame href for an item, forwarding custom query params.
pub fn preview_frame_href(
    frame_path: &str,
    item_id: &str,
    view_mode: &str,
    custom_query_params: &QueryParams,
) -> String {
    let mut params = custom_query_params.clone();
    params.insert("id".to_string(), Some(item_id.to_string()));
    params.insert("viewMode".to_string(), Some(view_mode.to_string()));
    format!("{frame_path}?{}", stringify_query(&params))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Route fields derived from a location.
pub struct RouteState {
    pub location: RouterLocation,
    pub query: QueryParams,
    pub path: String,
    pub view_mode: Option<String>,
    pub item_id: Option<String>,
    pub ref_id: Option<String>,
    pub url: String,
}

impl RouteState {
    /// Derives route fields from `location`.
    ///
    /// The routed path comes from the `path` query param (default `/`). When the path names no
    /// item, a `storyId` query param supplies it.
    pub fn from_location(location: &RouterLocation) -> Self {
        let query = parse_query(&location.search);
        let path = query
            .get("path")
            .and_then(|value| value.as_deref())
            .filter(|value| !value.is_empty())
            .unwrap_or("/")
            .to_string();
        let parsed = parse_path(&path);
        let item_id = parsed.item_id.or_else(|| {
            query
                .get("storyId")
                .and_then(|value| value.clone())
                .filter(|value| !value.is_empty())
        });

        Self {
            location: location.clone(),
            query,
            path,
            view_mode: parsed.view_mode,
            item_id,
            ref_id: parsed.ref_id,
            url: location.href(),
        }
    }
}
