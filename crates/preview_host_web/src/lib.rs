//! Browser (`wasm32`) implementations of [`preview_host`] service contracts.
//!
//! On non-wasm targets every adapter compiles to an inert stand-in so the manager crates can be
//! built and tested natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod defer;
pub mod navigation;

pub use adapters::{defer_backend, navigation_service};
pub use defer::{DeferStrategy, WebDeferBackend};
pub use navigation::WebNavigationService;
