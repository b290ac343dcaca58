//! History-API backed navigation adapter.

use preview_host::{NavigateOptions, NavigationService, RouterLocation};

#[derive(Debug, Clone, Copy, Default)]
/// Browser navigation service backed by `window.location` and `window.history`.
///
/// Navigations dispatch a synthetic `popstate` so router listeners observe the new location the
/// same way they observe back/forward navigation.
pub struct WebNavigationService;

impl NavigationService for WebNavigationService {
    fn location(&self) -> RouterLocation {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let location = window.location();
                return RouterLocation {
                    pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
                    search: location.search().unwrap_or_default(),
                    hash: location.hash().unwrap_or_default(),
                };
            }
        }

        RouterLocation::from_href("/")
    }

    fn navigate(&self, url: &str, options: &NavigateOptions) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsValue;

            let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
            let history = window
                .history()
                .map_err(|e| format!("history unavailable: {e:?}"))?;
            let state = match &options.state {
                Some(state) => serde_wasm_bindgen::to_value(state)
                    .map_err(|e| format!("history state serialization failed: {e}"))?,
                None => JsValue::NULL,
            };

            if options.replace {
                history
                    .replace_state_with_url(&state, "", Some(url))
                    .map_err(|e| format!("history.replaceState failed: {e:?}"))?;
            } else {
                history
                    .push_state_with_url(&state, "", Some(url))
                    .map_err(|e| format!("history.pushState failed: {e:?}"))?;
            }

            let event = web_sys::PopStateEvent::new("popstate")
                .map_err(|e| format!("popstate event construction failed: {e:?}"))?;
            window
                .dispatch_event(&event)
                .map_err(|e| format!("popstate dispatch failed: {e:?}"))?;
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (url, options);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_navigation_is_inert() {
        let service = WebNavigationService;
        assert_eq!(service.location(), RouterLocation::from_href("/"));
        service
            .navigate("?path=/story/a--b", &NavigateOptions::replace())
            .expect("navigate");
        assert_eq!(service.location().search, "");
    }
}
