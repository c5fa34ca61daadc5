//! Comparison session: the items being compared and their UI state.
//!
//! A session owns the compared items, keeps the spec key set and visibility
//! map in step with them, and reports save outcomes through a [`Notifier`].
//! Persistence failures never touch the in-memory state.

use crate::best::select_best;
use crate::catalog::Catalog;
use crate::config::ComparaConfig;
use crate::error::{ComparisonError, Result, SnapshotError};
use crate::notify::Notifier;
use crate::routing::Router;
use crate::snapshot::SnapshotStore;
use crate::spec_keys::{SpecKeySet, extract_keys, sort_keys};
use crate::table::ComparisonTable;
use crate::types::{ComparableItem, ItemId, NotificationKind, SavedComparison};
use crate::visibility::VisibilityMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub max_items: usize,
    pub highlight_best: bool,
    pub router: Router,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let defaults = crate::config::ComparisonConfig::default();
        Self {
            max_items: defaults.max_items,
            highlight_best: defaults.highlight_best,
            router: Router::new(defaults.detail_base_path),
        }
    }
}

impl From<&ComparaConfig> for SessionOptions {
    fn from(config: &ComparaConfig) -> Self {
        Self {
            max_items: config.comparison.max_items,
            highlight_best: config.comparison.highlight_best,
            router: Router::new(config.comparison.detail_base_path.clone()),
        }
    }
}

pub struct ComparisonSession {
    items: Vec<ComparableItem>,
    keys: SpecKeySet,
    visibility: VisibilityMap,
    options: SessionOptions,
    snapshots: SnapshotStore,
    notifier: Arc<dyn Notifier>,
}

impl ComparisonSession {
    pub fn new(
        snapshots: SnapshotStore,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Self {
        Self {
            items: Vec::new(),
            keys: SpecKeySet::new(),
            visibility: VisibilityMap::default(),
            options,
            snapshots,
            notifier,
        }
    }

    pub fn items(&self) -> &[ComparableItem] {
        &self.items
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Spec keys in display order.
    pub fn spec_keys(&self) -> Vec<String> {
        sort_keys(&self.keys)
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    /// Replace the compared items. Duplicate ids after the first are ignored.
    pub fn set_items(&mut self, items: Vec<ComparableItem>) -> Result<()> {
        let mut unique: Vec<ComparableItem> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|u| u.id == item.id) {
                unique.push(item);
            }
        }
        if unique.len() > self.options.max_items {
            return Err(ComparisonError::LimitReached {
                max: self.options.max_items,
            }
            .into());
        }
        self.items = unique;
        self.recompute();
        Ok(())
    }

    /// Add one item. Returns `Ok(false)` if it is already compared.
    pub fn add_item(&mut self, item: ComparableItem) -> Result<bool> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Ok(false);
        }
        if self.items.len() >= self.options.max_items {
            return Err(ComparisonError::LimitReached {
                max: self.options.max_items,
            }
            .into());
        }
        self.items.push(item);
        self.recompute();
        Ok(true)
    }

    /// Remove one item. Returns whether it was present.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    fn recompute(&mut self) {
        self.keys = extract_keys(&self.items);
        self.visibility.sync(&self.keys);
        debug!(
            items = self.items.len(),
            keys = self.keys.len(),
            "Recomputed spec keys"
        );
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visibility.is_visible(key)
    }

    /// Flip visibility of one key; unknown keys are ignored.
    pub fn toggle(&mut self, key: &str) -> bool {
        self.visibility.toggle(key)
    }

    /// Force one key hidden; unknown keys are ignored.
    pub fn hide(&mut self, key: &str) -> bool {
        self.visibility.set(key, false)
    }

    pub fn show_all(&mut self) {
        self.visibility.show_all();
    }

    pub fn visible_keys(&self) -> Vec<String> {
        self.visibility.visible_keys()
    }

    pub fn best(&self) -> Option<ItemId> {
        select_best(&self.items, self.options.highlight_best)
    }

    pub fn table(&self) -> ComparisonTable {
        ComparisonTable::build(
            &self.items,
            &self.visibility,
            self.options.highlight_best,
            &self.options.router,
        )
    }

    /// Save the current comparison under `name` and notify the outcome.
    pub fn save(&self, name: &str) -> std::result::Result<SavedComparison, SnapshotError> {
        match self.snapshots.save(name, &self.items, &self.visibility) {
            Ok(saved) => {
                self.notifier.notify(
                    "Comparison saved",
                    &format!("\"{}\" has been saved", saved.name),
                    NotificationKind::Success,
                );
                Ok(saved)
            }
            Err(SnapshotError::NameRequired) => {
                self.notifier.notify(
                    "Error",
                    "Please enter a name for your comparison",
                    NotificationKind::Error,
                );
                Err(SnapshotError::NameRequired)
            }
            Err(err) => {
                self.notifier.notify(
                    "Error",
                    "Failed to save comparison",
                    NotificationKind::Error,
                );
                Err(err)
            }
        }
    }

    pub fn saved(&self) -> Vec<SavedComparison> {
        self.snapshots.list_all()
    }

    /// Delete every saved comparison and notify the outcome.
    pub fn clear_saved(&self) -> std::result::Result<(), SnapshotError> {
        match self.snapshots.clear_all() {
            Ok(()) => {
                self.notifier.notify(
                    "Saved comparisons cleared",
                    "All saved comparisons have been removed",
                    NotificationKind::Success,
                );
                Ok(())
            }
            Err(err) => {
                self.notifier.notify(
                    "Error",
                    "Failed to clear saved comparisons",
                    NotificationKind::Error,
                );
                Err(err)
            }
        }
    }

    /// Replace the compared items with the catalog's items for `ids`.
    pub async fn load(&mut self, catalog: &dyn Catalog, ids: &[ItemId]) -> Result<()> {
        let items = catalog.fetch_items(ids).await?;
        if items.len() < ids.len() {
            warn!(
                requested = ids.len(),
                found = items.len(),
                "Some compared items are no longer in the catalog"
            );
        }
        self.set_items(items)
    }

    /// Reopen a saved comparison: reload its items and apply its visible
    /// keys. Keys the snapshot did not record as visible start hidden.
    pub async fn restore(&mut self, saved: &SavedComparison, catalog: &dyn Catalog) -> Result<()> {
        self.load(catalog, &saved.product_ids).await?;
        let keys: Vec<String> = self.visibility.keys().cloned().collect();
        for key in keys {
            let visible = saved.visible_specs.contains(&key);
            self.visibility.set(&key, visible);
        }
        info!(id = %saved.id, name = %saved.name, "Restored comparison");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::error::ComparaError;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStore;

    fn vac(id: i64, rating: f64, specs: &[(&str, &str)]) -> ComparableItem {
        specs.iter().fold(
            ComparableItem::new(id, format!("Vac {id}")).with_rating(rating),
            |item, (k, v)| item.with_spec(*k, *v),
        )
    }

    fn session(max_items: usize) -> (ComparisonSession, Arc<MemoryStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let options = SessionOptions {
            max_items,
            ..SessionOptions::default()
        };
        let session =
            ComparisonSession::new(SnapshotStore::new(store.clone()), notifier.clone(), options);
        (session, store, notifier)
    }

    #[test]
    fn test_keys_and_visibility_track_items() {
        let (mut s, _, _) = session(4);
        s.set_items(vec![
            vac(1, 4.0, &[("Brand", "A"), ("Weight", "2kg")]),
            vac(2, 4.5, &[("Brand", "B"), ("Power", "200W")]),
        ])
        .unwrap();
        assert_eq!(s.spec_keys(), vec!["Brand", "Weight", "Power"]);
        assert_eq!(s.visible_keys(), s.spec_keys());

        s.toggle("Power");
        assert!(s.remove_item(&ItemId::Number(1)));
        assert_eq!(s.spec_keys(), vec!["Brand", "Power"]);
        assert!(!s.is_visible("Power"));
        assert!(!s.is_visible("Weight"));
        assert_eq!(s.visibility().len(), 2);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let (mut s, _, _) = session(4);
        s.set_items(vec![vac(1, 4.0, &[("Brand", "A"), ("Weight", "2kg")])])
            .unwrap();
        assert!(s.hide("Brand"));
        assert!(s.hide("Brand"));
        assert!(!s.is_visible("Brand"));
        assert_eq!(s.visible_keys(), vec!["Weight"]);
        assert!(!s.hide("Colour"));
    }

    #[test]
    fn test_limit_and_duplicates() {
        let (mut s, _, _) = session(2);
        assert!(s.add_item(vac(1, 1.0, &[])).unwrap());
        assert!(!s.add_item(vac(1, 1.0, &[])).unwrap());
        assert!(s.add_item(vac(2, 1.0, &[])).unwrap());
        let err = s.add_item(vac(3, 1.0, &[])).unwrap_err();
        assert!(matches!(
            err,
            ComparaError::Comparison(ComparisonError::LimitReached { max: 2 })
        ));
        assert!(
            s.set_items(vec![vac(1, 1.0, &[]), vac(2, 1.0, &[]), vac(3, 1.0, &[])])
                .is_err()
        );
        assert_eq!(s.items().len(), 2);
    }

    #[test]
    fn test_best_respects_highlight_option() {
        let (mut s, _, _) = session(4);
        s.set_items(vec![vac(1, 4.5, &[]), vac(2, 4.9, &[])]).unwrap();
        assert_eq!(s.best(), Some(ItemId::Number(2)));
        s.options.highlight_best = false;
        assert_eq!(s.best(), None);
        assert_eq!(s.table().best, None);
    }

    #[test]
    fn test_save_notifies_success_and_validation() {
        let (mut s, _, notifier) = session(4);
        s.set_items(vec![vac(10, 4.0, &[("Brand", "A")])]).unwrap();

        assert!(matches!(s.save("  "), Err(SnapshotError::NameRequired)));
        let saved = s.save("Mine").unwrap();
        assert_eq!(saved.product_ids, vec![ItemId::Number(10)]);

        let kinds: Vec<NotificationKind> =
            notifier.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Error, NotificationKind::Success]
        );
        assert_eq!(s.saved().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let (mut s, store, notifier) = session(4);
        s.set_items(vec![vac(1, 4.0, &[("Brand", "A"), ("Weight", "1kg")])])
            .unwrap();
        s.toggle("Weight");
        store.set_fail_writes(true);

        assert!(matches!(
            s.save("Doomed"),
            Err(SnapshotError::Persistence { .. })
        ));
        assert_eq!(s.items().len(), 1);
        assert_eq!(s.visible_keys(), vec!["Brand"]);
        let last = notifier.notifications().pop().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.description, "Failed to save comparison");
    }

    #[test]
    fn test_clear_saved() {
        let (s, _, notifier) = session(4);
        s.save("One").unwrap();
        s.clear_saved().unwrap();
        assert!(s.saved().is_empty());
        assert_eq!(notifier.notifications().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_applies_saved_visibility() {
        let catalog = InMemoryCatalog::new(vec![
            vac(1, 4.0, &[("Brand", "A"), ("Weight", "1kg")]),
            vac(2, 4.5, &[("Brand", "B"), ("Power", "200W")]),
        ]);
        let (mut s, _, _) = session(4);
        let saved = SavedComparison {
            id: "1".into(),
            name: "Old".into(),
            product_ids: vec![ItemId::Number(2), ItemId::Number(1), ItemId::Number(77)],
            visible_specs: vec!["Brand".into(), "Gone".into()],
            date_created: "2026-01-01T00:00:00.000Z".into(),
        };

        s.restore(&saved, &catalog).await.unwrap();
        assert_eq!(s.item_ids(), vec![ItemId::Number(2), ItemId::Number(1)]);
        assert_eq!(s.visible_keys(), vec!["Brand"]);
        assert!(!s.is_visible("Weight"));
        assert!(!s.is_visible("Gone"));
    }
}
