use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use manager_url::{
    provide_url_api, route::preview_frame_href, LocalEventBus, ManagerState, SignalManagerStore,
    UrlModule, UrlSyncConfig, UrlSyncServices,
};
use preview_host_web::{defer_backend, navigation_service};

const PREVIEW_FRAME_PATH: &str = "iframe.html";

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Preview Manager" />
        <Meta name="description" content="Component preview manager with shareable URLs." />

        <Router>
            <main class="manager-root">
                <Routes>
                    <Route path="" view=ManagerEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn ManagerEntry() -> impl IntoView {
    view! {
        <UrlSyncProvider>
            <PreviewFrame />
        </UrlSyncProvider>
    }
}

#[component]
/// Boots URL sync against the browser location and provides the URL API, the manager store and
/// the event bus to descendant components.
pub fn UrlSyncProvider(
    /// Overrides for the URL sync defaults.
    #[prop(optional)]
    config: UrlSyncConfig,
    children: Children,
) -> impl IntoView {
    let config = match config.validate() {
        Ok(()) => config,
        Err(err) => {
            logging::warn!("invalid url sync config, using defaults: {err}");
            UrlSyncConfig::default()
        }
    };

    let store = SignalManagerStore::new(ManagerState::default());
    let bus = LocalEventBus::default();
    let services = UrlSyncServices::new(
        Rc::new(store),
        navigation_service(),
        Rc::new(bus.clone()),
        defer_backend(config.idle_timeout_ms, config.fallback_delay_ms),
    )
    .with_config(config);

    let module = Rc::new(UrlModule::new(services));
    module.boot();
    let handle = module.init();
    on_cleanup(move || handle.uninstall());

    let popstate_listener = window_event_listener(ev::popstate, {
        let module = Rc::clone(&module);
        move |_| module.sync_location()
    });
    on_cleanup(move || popstate_listener.remove());

    provide_url_api(module.api().clone());
    provide_context(store);
    provide_context(bus);

    children().into_view()
}

#[component]
/// Renders the preview iframe for the selected item, passing custom query params through.
pub fn PreviewFrame() -> impl IntoView {
    let store = use_context::<SignalManagerStore>().expect("SignalManagerStore not provided");
    let state = store.signal();

    let layout_class = move || {
        state.with(|state| {
            let mut classes = vec!["manager-layout"];
            if state.layout.is_fullscreen {
                classes.push("is-fullscreen");
            }
            if !state.layout.show_nav {
                classes.push("nav-hidden");
            }
            if !state.layout.show_panel {
                classes.push("panel-hidden");
            }
            classes.join(" ")
        })
    };
    let panel_position = move || state.with(|state| state.layout.panel_position.token());
    let frame_src = move || {
        state.with(|state| {
            state.item_id.as_deref().map(|item_id| {
                preview_frame_href(
                    PREVIEW_FRAME_PATH,
                    item_id,
                    state.view_mode.as_deref().unwrap_or("story"),
                    &state.custom_query_params,
                )
            })
        })
    };

    view! {
        <div class=layout_class data-panel=panel_position>
            {move || match frame_src() {
                Some(src) => view! {
                    <iframe class="preview-frame" title="Preview" src=src></iframe>
                }
                .into_view(),
                None => view! { <p class="manager-empty">"No item selected."</p> }.into_view(),
            }}
        </div>
    }
}
