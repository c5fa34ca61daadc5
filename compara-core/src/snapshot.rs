//! Saved comparison snapshots.
//!
//! All snapshots live as one JSON array under a single storage key. Saving
//! reads the array, appends one record and writes the whole array back; there
//! is no merge, so concurrent writers sharing a store overwrite each other.
//! Listing is tolerant: missing or unparsable data is an empty list. Saving
//! only treats unparsable data as empty; a failed read aborts the save so the
//! existing list is never overwritten blind.

use crate::error::{SnapshotError, StorageError};
use crate::storage::KeyValueStore;
use crate::types::{ComparableItem, SavedComparison};
use crate::visibility::VisibilityMap;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Storage key holding the saved comparison list.
pub const DEFAULT_COMPARISONS_KEY: &str = "comparisonProducts";

/// Reads and appends saved comparisons on a [`KeyValueStore`].
pub struct SnapshotStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    clock: fn() -> DateTime<Utc>,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_COMPARISONS_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            clock: Utc::now,
        }
    }

    /// Replace the time source used for ids and `dateCreated`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist a new named comparison.
    ///
    /// The name is trimmed and must not be empty; in that case nothing is read
    /// or written. Item ids keep the order of `items`; only visible keys are
    /// recorded. Every successful call appends exactly one record.
    pub fn save(
        &self,
        name: &str,
        items: &[ComparableItem],
        visibility: &VisibilityMap,
    ) -> Result<SavedComparison, SnapshotError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SnapshotError::NameRequired);
        }

        let mut saved = match self.read_saved() {
            Ok(saved) => saved,
            Err(StorageError::Malformed { message, .. }) => {
                warn!(key = %self.key, %message, "Replacing unparsable saved comparisons");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved comparisons");
                return Err(SnapshotError::Persistence {
                    message: e.to_string(),
                });
            }
        };
        let now = (self.clock)();
        let record = SavedComparison {
            id: next_id(&saved, now),
            name: name.to_string(),
            product_ids: items.iter().map(|item| item.id.clone()).collect(),
            visible_specs: visibility.visible_keys(),
            date_created: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        saved.push(record.clone());

        let blob = serde_json::to_string(&saved).map_err(|e| SnapshotError::Persistence {
            message: e.to_string(),
        })?;
        self.store.set(&self.key, &blob).map_err(|e| {
            warn!(key = %self.key, error = %e, "Failed to persist comparison");
            SnapshotError::Persistence {
                message: e.to_string(),
            }
        })?;

        info!(
            id = %record.id,
            name = %record.name,
            items = record.product_ids.len(),
            "Saved comparison"
        );
        Ok(record)
    }

    /// Every saved comparison in save order. Never fails.
    pub fn list_all(&self) -> Vec<SavedComparison> {
        match self.read_saved() {
            Ok(saved) => saved,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring unreadable saved comparisons");
                Vec::new()
            }
        }
    }

    /// Look up a saved comparison by id.
    pub fn find(&self, id: &str) -> Option<SavedComparison> {
        self.list_all().into_iter().find(|s| s.id == id)
    }

    /// Delete every saved comparison.
    pub fn clear_all(&self) -> Result<(), SnapshotError> {
        self.store
            .remove(&self.key)
            .map_err(|e| SnapshotError::Persistence {
                message: e.to_string(),
            })?;
        info!(key = %self.key, "Cleared saved comparisons");
        Ok(())
    }

    /// Strict read: distinguishes "absent" from "unreadable".
    fn read_saved(&self) -> Result<Vec<SavedComparison>, StorageError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
            key: self.key.clone(),
            message: e.to_string(),
        })
    }
}

/// Millisecond timestamp, bumped past the newest numeric id already stored so
/// two saves in the same millisecond still get distinct ids.
fn next_id(existing: &[SavedComparison], now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis();
    let newest = existing
        .iter()
        .filter_map(|s| s.id.parse::<i64>().ok())
        .max();
    match newest {
        Some(newest) if newest >= candidate => (newest + 1).to_string(),
        _ => candidate.to_string(),
    }
}
