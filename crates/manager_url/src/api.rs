//! URL API exposed to other manager modules.

use std::rc::Rc;

use leptos::logging;
use preview_host::{NavigateOptions, NavigationService};

use crate::{
    model::UrlState, query::QueryParams, reducer::ManagerAction, store::ManagerStore,
};

#[derive(Clone)]
/// Read/write access to the shareable URL state.
pub struct UrlApi {
    store: Rc<dyn ManagerStore>,
    navigation: Rc<dyn NavigationService>,
}

impl UrlApi {
    /// Creates the API over the host store and navigation primitive.
    pub fn new(store: Rc<dyn ManagerStore>, navigation: Rc<dyn NavigationService>) -> Self {
        Self { store, navigation }
    }

    /// Forwards a navigation to the navigation primitive. Failures are logged, never raised.
    pub fn navigate_url(&self, url: &str, options: &NavigateOptions) {
        if let Err(err) = self.navigation.navigate(url, options) {
            logging::warn!("navigation to `{url}` failed: {err}");
        }
    }

    /// Returns the custom query param `key`. Bare keys (no `=`) read as `None`.
    pub fn get_query_param(&self, key: &str) -> Option<String> {
        self.store
            .state()
            .custom_query_params
            .get(key)
            .cloned()
            .flatten()
    }

    /// Returns the current URL snapshot.
    pub fn get_url_state(&self) -> UrlState {
        self.store.state().url_state()
    }

    /// Merges `input` into the custom query params.
    ///
    /// `Some` values are written, `None` values remove their key. The store is only written when
    /// the merged params differ from the current ones.
    pub fn set_query_params(&self, input: &QueryParams) {
        let current = self.store.state().custom_query_params;
        let mut merged = (*current).clone();
        for (key, value) in input {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), Some(value.clone()));
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        if merged != *current {
            self.store
                .dispatch(ManagerAction::SetCustomQueryParams(Rc::new(merged)));
        }
    }

    /// Sets a single custom query param.
    pub fn set_query_param(&self, key: &str, value: Option<String>) {
        let mut input = QueryParams::new();
        input.insert(key.to_string(), value);
        self.set_query_params(&input);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use preview_host::MemoryNavigationService;

    use super::*;
    use crate::store::MemoryManagerStore;

    fn api() -> (UrlApi, MemoryManagerStore, MemoryNavigationService) {
        let store = MemoryManagerStore::default();
        let navigation = MemoryNavigationService::at("/");
        let api = UrlApi::new(Rc::new(store.clone()), Rc::new(navigation.clone()));
        (api, store, navigation)
    }

    fn params(entries: &[(&str, Option<&str>)]) -> QueryParams {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn repeated_identical_writes_hit_the_store_once() {
        let (api, store, _) = api();
        api.set_query_params(&params(&[("a", Some("1"))]));
        api.set_query_params(&params(&[("a", Some("1"))]));
        assert_eq!(store.write_count(), 1);
        assert_eq!(api.get_query_param("a").as_deref(), Some("1"));
    }

    #[test]
    fn null_entries_remove_keys() {
        let (api, store, _) = api();
        api.set_query_params(&params(&[("a", Some("1")), ("b", Some("2"))]));
        api.set_query_params(&params(&[("a", None)]));

        assert_eq!(api.get_query_param("a"), None);
        assert!(!store.state().custom_query_params.contains_key("a"));
        assert_eq!(api.get_query_param("b").as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);

        api.set_query_params(&params(&[("missing", None)]));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn url_state_exposes_custom_params() {
        let (api, _, _) = api();
        api.set_query_param("foo", Some("bar".to_string()));
        let url_state = api.get_url_state();
        assert_eq!(url_state.query_params.get("foo"), Some(&Some("bar".to_string())));
        assert_eq!(url_state.path, "/");
    }

    #[test]
    fn navigate_url_forwards_verbatim() {
        let (api, _, navigation) = api();
        api.navigate_url("/settings/shortcuts", &NavigateOptions::default());
        let records = navigation.navigations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "/settings/shortcuts");
        assert!(!records[0].options.replace);
    }
}
