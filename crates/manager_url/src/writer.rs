//! Event-driven URL writes.
//!
//! Item selection and globals changes rewrite the address bar immediately. Args updates arrive in
//! bursts while controls are edited, so they go through a single-slot scheduler and only the last
//! one in a burst serializes.

use std::rc::Rc;

use preview_host::NavigateOptions;

use crate::{
    api::UrlApi,
    codec::ArgsCodec,
    config::UrlSyncConfig,
    events::{EventBus, EventTopic, ManagerEvent, SubscriptionId},
    model::{CurrentItem, ItemArgs},
    module::UrlSyncServices,
    reducer::ManagerAction,
    route::query_path,
    scheduler::SingleSlotScheduler,
    store::ManagerStore,
};

struct SyncContext {
    api: UrlApi,
    store: Rc<dyn ManagerStore>,
    codec: Rc<dyn ArgsCodec>,
    config: UrlSyncConfig,
}

impl SyncContext {
    /// Rewrites the URL to `path` plus `&<key>=<encoded>` in place and mirrors the value into the
    /// custom query params.
    fn write_param(&self, path: &str, key: &str, encoded: String) {
        let suffix = if encoded.is_empty() {
            String::new()
        } else {
            format!("&{key}={encoded}")
        };
        self.api.navigate_url(
            &query_path(&format!("{path}{suffix}")),
            &NavigateOptions::replace(),
        );
        self.api.set_query_param(key, Some(encoded));
    }

    /// Serializes the current item's args, omitting values equal to their initial value.
    fn update_args_param(&self) {
        let url_state = self.api.get_url_state();
        if url_state.view_mode.as_deref() != Some(self.config.detail_view_mode.as_str()) {
            return;
        }
        let Some(CurrentItem {
            args: Some(ItemArgs { initial_args, args }),
            ..
        }) = self.store.state().current_item
        else {
            return;
        };

        let encoded = self.codec.build_args_param(&initial_args, &args);
        self.write_param(&url_state.path, "args", encoded);
    }

    fn record_current_item(&self, item: &CurrentItem) {
        if self.store.state().current_item.as_ref() != Some(item) {
            self.store
                .dispatch(ManagerAction::SetCurrentItem(Some(item.clone())));
        }
    }
}

/// Subscriptions installed by [`install_url_sync`].
pub struct UrlSyncHandle {
    bus: Rc<dyn EventBus>,
    subscriptions: Vec<SubscriptionId>,
    scheduler: Rc<SingleSlotScheduler>,
}

impl UrlSyncHandle {
    /// Returns whether a debounced args write is waiting to run.
    pub fn has_pending_args_write(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Unsubscribes every handler and drops any pending args write.
    pub fn uninstall(self) {
        for id in self.subscriptions {
            self.bus.unsubscribe(id);
        }
        self.scheduler.cancel();
    }
}

/// Subscribes the URL writers on `services.bus` and opens release notes when they are pending.
pub fn install_url_sync(services: &UrlSyncServices, api: &UrlApi) -> UrlSyncHandle {
    let ctx = Rc::new(SyncContext {
        api: api.clone(),
        store: Rc::clone(&services.store),
        codec: Rc::clone(&services.codec),
        config: services.config.clone(),
    });
    let scheduler = Rc::new(SingleSlotScheduler::new(Rc::clone(&services.defer)));
    let bus = Rc::clone(&services.bus);

    let mut subscriptions = Vec::with_capacity(4);

    subscriptions.push(bus.subscribe(EventTopic::CurrentItemSelected, {
        let ctx = Rc::clone(&ctx);
        Rc::new(move |_: &ManagerEvent| ctx.update_args_param())
    }));

    subscriptions.push(bus.subscribe(EventTopic::ItemArgsUpdated, {
        let ctx = Rc::clone(&ctx);
        let scheduler = Rc::clone(&scheduler);
        Rc::new(move |event: &ManagerEvent| {
            if let ManagerEvent::ItemArgsUpdated(item) = event {
                ctx.record_current_item(item);
            }
            let ctx = Rc::clone(&ctx);
            scheduler.schedule_replacing(move || ctx.update_args_param());
        })
    }));

    subscriptions.push(bus.subscribe(EventTopic::GlobalsUpdated, {
        let ctx = Rc::clone(&ctx);
        Rc::new(move |event: &ManagerEvent| {
            let ManagerEvent::GlobalsUpdated {
                globals,
                initial_globals,
            } = event
            else {
                return;
            };
            let path = ctx.api.get_url_state().path;
            let encoded = ctx.codec.build_args_param(initial_globals, globals);
            ctx.write_param(&path, "globals", encoded);
        })
    }));

    subscriptions.push(bus.subscribe(EventTopic::NavigateUrlRequested, {
        let ctx = Rc::clone(&ctx);
        Rc::new(move |event: &ManagerEvent| {
            if let ManagerEvent::NavigateUrlRequested { url, options } = event {
                ctx.api.navigate_url(url, options);
            }
        })
    }));

    if services.store.state().show_release_notes_on_launch {
        api.navigate_url(
            &query_path(&services.config.release_notes_path),
            &NavigateOptions::default(),
        );
    }

    UrlSyncHandle {
        bus,
        subscriptions,
        scheduler,
    }
}
