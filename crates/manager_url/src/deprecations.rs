//! Compatibility table for retired query params.
//!
//! Each retired layout alias maps onto its modern equivalent and warns once per log. Deleting an
//! alias is a one-line change to [`LEGACY_LAYOUT_PARAMS`].

use crate::{
    item_id::{sanitize, to_id},
    model::{LayoutPatch, PanelPosition},
    query::QueryParams,
    warnings::OnceWarnings,
};

const MIGRATION_HINT: &str = "See the layout URL params section of the migration guide.";

/// A retired layout query param and the modern patch it stands for.
pub struct LegacyLayoutParam {
    /// Query key.
    pub key: &'static str,
    /// Value that triggers the alias; any other value is ignored.
    pub value: &'static str,
    /// Modern spelling, quoted in the warning.
    pub replacement: &'static str,
    /// One-time warning key.
    pub warning_key: &'static str,
    /// Applies the modern equivalent.
    pub apply: fn(&mut LayoutPatch),
}

impl LegacyLayoutParam {
    /// Returns whether `query` carries this alias with its triggering value.
    pub fn matches(&self, query: &QueryParams) -> bool {
        query
            .get(self.key)
            .and_then(|value| value.as_deref())
            .is_some_and(|value| value == self.value)
    }

    /// Deprecation message for this alias.
    pub fn warning(&self) -> String {
        format!(
            "The '{}' query param is deprecated and will be removed. Use '{}' instead.\n\n{MIGRATION_HINT}",
            self.key, self.replacement
        )
    }
}

/// Retired layout aliases, applied in order after the modern params.
pub const LEGACY_LAYOUT_PARAMS: &[LegacyLayoutParam] = &[
    LegacyLayoutParam {
        key: "addons",
        value: "0",
        replacement: "panel=false",
        warning_key: "legacy-param.addons",
        apply: |layout| layout.show_panel = Some(false),
    },
    LegacyLayoutParam {
        key: "panelRight",
        value: "1",
        replacement: "panel=right",
        warning_key: "legacy-param.panelRight",
        apply: |layout| layout.panel_position = Some(PanelPosition::Right),
    },
    LegacyLayoutParam {
        key: "stories",
        value: "0",
        replacement: "nav=false",
        warning_key: "legacy-param.stories",
        apply: |layout| layout.show_nav = Some(false),
    },
];

/// Applies every matching legacy alias to `layout`, warning once per alias.
pub fn apply_legacy_layout_params(
    query: &QueryParams,
    layout: &mut LayoutPatch,
    warnings: &OnceWarnings,
) {
    for alias in LEGACY_LAYOUT_PARAMS.iter().filter(|alias| alias.matches(query)) {
        warnings.warn(alias.warning_key, &alias.warning());
        (alias.apply)(layout);
    }
}

/// Synthesizes an item id from the retired `selectedKind`/`selectedStory` pair.
///
/// Returns `None` when `selectedKind` is absent or empty, or when the pair cannot form an id.
/// A kind without a story resolves to the sanitized kind, which later acts as an id prefix.
pub fn legacy_item_id(query: &QueryParams, warnings: &OnceWarnings) -> Option<String> {
    let non_empty = |key: &str| {
        query
            .get(key)
            .and_then(|value| value.as_deref())
            .filter(|value| !value.is_empty())
    };
    let kind = non_empty("selectedKind")?;

    warnings.warn(
        "legacy-param.selectedKind",
        &format!(
            "The 'selectedKind' and 'selectedStory' query params are deprecated and will be removed. Use 'path' instead.\n\n{MIGRATION_HINT}"
        ),
    );

    match non_empty("selectedStory") {
        Some(story) => match to_id(kind, story) {
            Ok(id) => Some(id),
            Err(err) => {
                leptos::logging::warn!("ignoring legacy item selection: {err}");
                None
            }
        },
        None => Some(sanitize(kind)),
    }
}
