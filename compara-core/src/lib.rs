//! # Compara Core
//!
//! Product comparison engine for the Compara affiliate catalog.
//! Derives comparable specification keys across products, orders and toggles
//! them, highlights the best-rated product, and persists named comparisons to
//! a key-value store.

pub mod best;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod routing;
pub mod session;
pub mod snapshot;
pub mod spec_keys;
pub mod storage;
pub mod table;
pub mod types;
pub mod visibility;

// Re-export commonly used types at the crate root.
pub use best::select_best;
pub use catalog::{Catalog, HttpCatalog, InMemoryCatalog, JsonFileCatalog, build_catalog};
pub use config::{ComparaConfig, config_exists, load_config};
pub use error::{ComparaError, Result};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use routing::Router;
pub use session::{ComparisonSession, SessionOptions};
pub use snapshot::SnapshotStore;
pub use spec_keys::{SPEC_PRIORITY, SpecKeySet, extract_keys, sort_keys};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use table::ComparisonTable;
pub use types::{ComparableItem, ItemId, NotificationKind, SavedComparison};
pub use visibility::VisibilityMap;
