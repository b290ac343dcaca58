//! Typed host-service contracts shared by the preview manager runtime and browser adapters.
//!
//! This crate is the API-first boundary for the two browser capabilities the manager's URL sync
//! depends on: the navigation primitive (address-bar reads and history writes) and deferred
//! callbacks. Concrete browser adapters live in `preview_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod defer;
pub mod navigation;

pub use defer::{DeferBackend, DeferHandle, DeferredTask, ManualDeferBackend};
pub use navigation::{
    MemoryNavigationService, NavigateOptions, NavigationRecord, NavigationService,
    NoopNavigationService, RouterLocation,
};
