//! Per-attribute visibility toggles for the comparison table.
//!
//! The domain of the map always equals the current [`SpecKeySet`]: syncing to a
//! new key set inserts unseen keys as visible and drops keys that disappeared.
//! Toggles for keys that are still present survive a sync.

use crate::spec_keys::{SpecKeySet, sort_keys};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityMap {
    entries: BTreeMap<String, bool>,
}

impl VisibilityMap {
    /// Build a map where every key is visible.
    pub fn new(keys: &SpecKeySet) -> Self {
        let mut map = Self::default();
        map.sync(keys);
        map
    }

    /// Track a recomputed key set.
    pub fn sync(&mut self, keys: &SpecKeySet) {
        let before = self.entries.len();
        self.entries.retain(|key, _| keys.contains(key));
        let dropped = before - self.entries.len();
        let mut added = 0usize;
        for key in keys {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), true);
                added += 1;
            }
        }
        debug!(added, dropped, total = self.entries.len(), "Visibility synced");
    }

    /// Unknown keys are never visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Flip one key. Returns `false` and changes nothing if the key is not in
    /// the current key set.
    pub fn toggle(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(visible) => {
                *visible = !*visible;
                true
            }
            None => false,
        }
    }

    /// Set one key explicitly. Same membership rule as [`toggle`](Self::toggle).
    pub fn set(&mut self, key: &str, visible: bool) -> bool {
        match self.entries.get_mut(key) {
            Some(v) => {
                *v = visible;
                true
            }
            None => false,
        }
    }

    /// Make every key visible again.
    pub fn show_all(&mut self) {
        self.entries.values_mut().for_each(|v| *v = true);
    }

    /// Visible keys in display priority order.
    pub fn visible_keys(&self) -> Vec<String> {
        let visible = self
            .entries
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(key, _)| key);
        sort_keys(visible)
    }

    /// Hidden keys in display priority order.
    pub fn hidden_keys(&self) -> Vec<String> {
        let hidden = self
            .entries
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(key, _)| key);
        sort_keys(hidden)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> SpecKeySet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_visible_by_default() {
        let map = VisibilityMap::new(&keys(&["Zebra", "Brand", "Weight"]));
        assert_eq!(map.visible_keys(), vec!["Brand", "Weight", "Zebra"]);
        assert!(map.hidden_keys().is_empty());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut map = VisibilityMap::new(&keys(&["Brand"]));
        let before = map.is_visible("Brand");
        assert!(map.toggle("Brand"));
        assert_ne!(map.is_visible("Brand"), before);
        assert!(map.toggle("Brand"));
        assert_eq!(map.is_visible("Brand"), before);
    }

    #[test]
    fn test_toggle_unknown_key_is_noop() {
        let mut map = VisibilityMap::new(&keys(&["Brand"]));
        let snapshot = map.clone();
        assert!(!map.toggle("Power"));
        assert_eq!(map, snapshot);
        assert!(!map.is_visible("Power"));
    }

    #[test]
    fn test_sync_keeps_toggles_and_tracks_domain() {
        let mut map = VisibilityMap::new(&keys(&["Brand", "Weight"]));
        map.toggle("Weight");
        map.sync(&keys(&["Weight", "Power"]));

        let domain: Vec<&String> = map.keys().collect();
        assert_eq!(domain, vec!["Power", "Weight"]);
        assert!(!map.is_visible("Weight"));
        assert!(map.is_visible("Power"));
        assert!(!map.is_visible("Brand"));
    }

    #[test]
    fn test_show_all_and_set() {
        let mut map = VisibilityMap::new(&keys(&["Brand", "Model"]));
        assert!(map.set("Model", false));
        assert_eq!(map.hidden_keys(), vec!["Model"]);
        map.show_all();
        assert!(map.hidden_keys().is_empty());
        assert!(!map.set("Nope", false));
    }
}
