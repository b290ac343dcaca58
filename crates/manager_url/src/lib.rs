//! Address-bar synchronization for the preview manager.
//!
//! Decodes the boot location into layout/UI patches, the selected item id and the pass-through
//! custom query params, and keeps `args`/`globals` query params in sync with manager events so
//! the current view stays shareable.

pub mod api;
pub mod codec;
pub mod config;
pub mod context;
pub mod decoder;
pub mod deprecations;
pub mod error;
pub mod events;
pub mod item_id;
pub mod model;
pub mod module;
pub mod query;
pub mod reducer;
pub mod route;
pub mod scheduler;
pub mod store;
pub mod warnings;
pub mod writer;

pub use api::UrlApi;
pub use codec::{ArgsCodec, ArgsParamCodec};
pub use config::UrlSyncConfig;
pub use context::{provide_url_api, use_url_api};
pub use decoder::{DecodedUrl, UrlDecoder};
pub use error::UrlSyncError;
pub use events::{EventBus, EventHandler, EventTopic, LocalEventBus, ManagerEvent, SubscriptionId};
pub use item_id::{sanitize, to_id};
pub use model::*;
pub use module::{UrlModule, UrlSyncServices};
pub use query::{parse_query, stringify_query, QueryParams};
pub use reducer::{reduce_manager, ManagerAction};
pub use route::{parse_path, query_path, ParsedPath, RouteState};
pub use scheduler::SingleSlotScheduler;
pub use store::{ManagerStore, MemoryManagerStore, SignalManagerStore};
pub use warnings::OnceWarnings;
pub use writer::{install_url_sync, UrlSyncHandle};
