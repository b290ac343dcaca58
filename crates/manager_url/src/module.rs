//! URL sync module wiring: service bundle, boot decode and writer installation.

use std::{cell::RefCell, rc::Rc};

use preview_host::{DeferBackend, NavigationService};

use crate::{
    api::UrlApi,
    codec::{ArgsCodec, ArgsParamCodec},
    config::UrlSyncConfig,
    decoder::{DecodedUrl, UrlDecoder},
    events::EventBus,
    reducer::ManagerAction,
    route::RouteState,
    store::ManagerStore,
    warnings::OnceWarnings,
    writer::{install_url_sync, UrlSyncHandle},
};

#[derive(Clone)]
/// Collaborators injected into the URL sync module.
pub struct UrlSyncServices {
    pub store: Rc<dyn ManagerStore>,
    pub navigation: Rc<dyn NavigationService>,
    pub bus: Rc<dyn EventBus>,
    pub codec: Rc<dyn ArgsCodec>,
    pub defer: Rc<dyn DeferBackend>,
    pub config: UrlSyncConfig,
}

impl UrlSyncServices {
    /// Bundles the host collaborators with the default codec and configuration.
    pub fn new(
        store: Rc<dyn ManagerStore>,
        navigation: Rc<dyn NavigationService>,
        bus: Rc<dyn EventBus>,
        defer: Rc<dyn DeferBackend>,
    ) -> Self {
        Self {
            store,
            navigation,
            bus,
            codec: Rc::new(ArgsParamCodec::default()),
            defer,
            config: UrlSyncConfig::default(),
        }
    }

    /// Replaces the args codec.
    pub fn with_codec(mut self, codec: Rc<dyn ArgsCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: UrlSyncConfig) -> Self {
        self.config = config;
        self
    }
}

/// The URL sync module: decoded boot state, the URL API and the writer installer.
pub struct UrlModule {
    services: UrlSyncServices,
    api: UrlApi,
    decoder: RefCell<UrlDecoder>,
    initial: DecodedUrl,
}

impl UrlModule {
    /// Decodes the current location. Nothing is written to the store until [`Self::boot`].
    pub fn new(services: UrlSyncServices) -> Self {
        let mut decoder = UrlDecoder::new(OnceWarnings::default())
            .with_previous(services.store.state().custom_query_params);
        let initial = decoder.decode(&RouteState::from_location(&services.navigation.location()));
        let api = UrlApi::new(
            Rc::clone(&services.store),
            Rc::clone(&services.navigation),
        );

        Self {
            services,
            api,
            decoder: RefCell::new(decoder),
            initial,
        }
    }

    /// Returns the URL API.
    pub fn api(&self) -> &UrlApi {
        &self.api
    }

    /// Returns the boot decode.
    pub fn initial_state(&self) -> &DecodedUrl {
        &self.initial
    }

    /// Merges the boot decode into the host store.
    pub fn boot(&self) {
        self.services
            .store
            .dispatch(ManagerAction::ApplyDecodedUrl(self.initial.clone()));
    }

    /// Installs the event-driven URL writers.
    pub fn init(&self) -> UrlSyncHandle {
        install_url_sync(&self.services, &self.api)
    }

    /// Re-reads the location after an upstream change and refreshes the route fields.
    ///
    /// Layout, UI and the stored custom params are left as they are.
    pub fn sync_location(&self) {
        let route = RouteState::from_location(&self.services.navigation.location());
        let decoded = self.decoder.borrow_mut().decode(&route);
        self.services
            .store
            .dispatch(ManagerAction::LocationChanged(decoded));
    }
}
