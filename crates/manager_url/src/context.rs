//! Leptos context access to the URL API.

use leptos::{provide_context, use_context};

use crate::api::UrlApi;

/// Provides `api` to descendant components.
pub fn provide_url_api(api: UrlApi) {
    provide_context(api);
}

/// Returns the [`UrlApi`] provided by an ancestor.
///
/// # Panics
///
/// Panics if called outside a component tree where [`provide_url_api`] ran.
pub fn use_url_api() -> UrlApi {
    use_context::<UrlApi>().expect("UrlApi not provided")
}
