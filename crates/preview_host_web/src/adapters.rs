use std::rc::Rc;

use preview_host::{DeferBackend, NavigationService};

use crate::{defer::WebDeferBackend, navigation::WebNavigationService};

/// Returns the browser navigation service.
pub fn navigation_service() -> Rc<dyn NavigationService> {
    Rc::new(WebNavigationService)
}

/// Detects the best deferral mechanism once and returns the backend bound to it.
///
/// `idle_timeout_ms` bounds how long an idle callback may wait; `fallback_delay_ms` is the timer
/// delay used when idle callbacks are unavailable.
pub fn defer_backend(idle_timeout_ms: u32, fallback_delay_ms: u32) -> Rc<dyn DeferBackend> {
    let backend = WebDeferBackend::detect(idle_timeout_ms, fallback_delay_ms);
    leptos::logging::log!("url sync deferral strategy: {:?}", backend.strategy());
    Rc::new(backend)
}
