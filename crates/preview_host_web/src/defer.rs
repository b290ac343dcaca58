//! Idle-callback/timer deferral adapter.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use preview_host::{DeferBackend, DeferHandle, DeferredTask};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

#[cfg(target_arch = "wasm32")]
type JsCallback = Closure<dyn FnMut()>;
#[cfg(not(target_arch = "wasm32"))]
type JsCallback = ();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Deferral mechanism selected for a [`WebDeferBackend`].
pub enum DeferStrategy {
    /// `requestIdleCallback` with an upper bound on the wait.
    IdleCallback {
        /// Maximum wait before the browser forces the callback.
        timeout_ms: u32,
    },
    /// `setTimeout` fallback for hosts without idle callbacks.
    Timeout {
        /// Timer delay.
        delay_ms: u32,
    },
}

/// Callbacks handed to the browser, keyed by their browser handle.
///
/// A callback is dropped when its handle is cancelled. A callback that ran is only marked
/// finished and dropped on the next registry access, since it cannot drop itself while running.
struct CallbackRegistry<C> {
    live: BTreeMap<i64, C>,
    finished: Vec<i64>,
}

impl<C> Default for CallbackRegistry<C> {
    fn default() -> Self {
        Self {
            live: BTreeMap::new(),
            finished: Vec::new(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<C> CallbackRegistry<C> {
    fn insert(&mut self, id: i64, callback: C) {
        self.live.insert(id, callback);
    }

    fn mark_finished(&mut self, id: i64) {
        self.finished.push(id);
    }

    fn remove(&mut self, id: i64) -> Option<C> {
        self.live.remove(&id)
    }

    /// Removes every finished callback. The caller drops them outside the borrow.
    fn take_finished(&mut self) -> Vec<C> {
        std::mem::take(&mut self.finished)
            .into_iter()
            .filter_map(|id| self.live.remove(&id))
            .collect()
    }

    fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[derive(Clone)]
/// Browser deferral backend bound to the strategy detected at construction.
pub struct WebDeferBackend {
    strategy: DeferStrategy,
    callbacks: Rc<RefCell<CallbackRegistry<JsCallback>>>,
}

impl fmt::Debug for WebDeferBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDeferBackend")
            .field("strategy", &self.strategy)
            .field("live_callbacks", &self.live_callbacks())
            .finish()
    }
}

impl WebDeferBackend {
    /// Probes `window.requestIdleCallback` once and binds the matching strategy.
    pub fn detect(idle_timeout_ms: u32, fallback_delay_ms: u32) -> Self {
        let strategy = if idle_callbacks_supported() {
            DeferStrategy::IdleCallback {
                timeout_ms: idle_timeout_ms,
            }
        } else {
            DeferStrategy::Timeout {
                delay_ms: fallback_delay_ms,
            }
        };
        Self::with_strategy(strategy)
    }

    /// Builds a backend with an explicit strategy.
    pub fn with_strategy(strategy: DeferStrategy) -> Self {
        Self {
            strategy,
            callbacks: Rc::default(),
        }
    }

    /// Returns the bound strategy.
    pub const fn strategy(&self) -> DeferStrategy {
        self.strategy
    }

    /// Returns how many browser callbacks are still held, pending or awaiting release.
    pub fn live_callbacks(&self) -> usize {
        self.callbacks.borrow().live_count()
    }

    fn release_finished(&self) {
        let finished = self.callbacks.borrow_mut().take_finished();
        drop(finished);
    }
}

fn idle_callbacks_supported() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };
        js_sys::Reflect::has(&window, &JsValue::from_str("requestIdleCallback")).unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

impl DeferBackend for WebDeferBackend {
    fn defer(&self, task: DeferredTask) -> Result<DeferHandle, String> {
        self.release_finished();

        #[cfg(target_arch = "wasm32")]
        {
            use std::cell::Cell;

            let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
            let handle_id = Rc::new(Cell::new(None::<i64>));
            let callback: JsCallback = {
                let callbacks = Rc::clone(&self.callbacks);
                let handle_id = Rc::clone(&handle_id);
                let mut task = Some(task);
                Closure::new(move || {
                    if let Some(task) = task.take() {
                        task();
                    }
                    if let Some(id) = handle_id.get() {
                        callbacks.borrow_mut().mark_finished(id);
                    }
                })
            };

            let requested = match self.strategy {
                DeferStrategy::IdleCallback { timeout_ms } => {
                    let options = web_sys::IdleRequestOptions::new();
                    options.set_timeout(timeout_ms);
                    window
                        .request_idle_callback_with_options(
                            callback.as_ref().unchecked_ref(),
                            &options,
                        )
                        .map(i64::from)
                        .map_err(|e| format!("requestIdleCallback failed: {e:?}"))
                }
                DeferStrategy::Timeout { delay_ms } => window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.as_ref().unchecked_ref(),
                        i32::try_from(delay_ms).unwrap_or(i32::MAX),
                    )
                    .map(i64::from)
                    .map_err(|e| format!("setTimeout failed: {e:?}")),
            };

            let id = requested?;
            handle_id.set(Some(id));
            self.callbacks.borrow_mut().insert(id, callback);
            Ok(DeferHandle(id))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            drop(task);
            Err("deferred callbacks are unavailable on this target".to_string())
        }
    }

    fn cancel(&self, handle: DeferHandle) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                match self.strategy {
                    DeferStrategy::IdleCallback { .. } => {
                        if let Ok(id) = u32::try_from(handle.0) {
                            window.cancel_idle_callback(id);
                        }
                    }
                    DeferStrategy::Timeout { .. } => {
                        if let Ok(id) = i32::try_from(handle.0) {
                            window.clear_timeout_with_handle(id);
                        }
                    }
                }
            }
        }

        let cancelled = self.callbacks.borrow_mut().remove(handle.0);
        drop(cancelled);
        self.release_finished();
    }
}
