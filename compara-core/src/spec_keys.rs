//! Specification key extraction and priority ordering.
//!
//! The key set of a comparison is the union of every attribute name defined by
//! any compared item. Display order puts well-known attributes first, in the
//! order of [`SPEC_PRIORITY`], followed by everything else alphabetically.

use crate::types::ComparableItem;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Attributes that always lead the comparison table, in this order.
pub const SPEC_PRIORITY: [&str; 11] = [
    "Brand",
    "Model",
    "Weight",
    "Dimensions",
    "Power",
    "Battery Life",
    "Speed Settings",
    "Attachments",
    "Warranty",
    "Noise Level",
    "Best For",
];

/// Union of attribute names across a comparison. Set semantics: each key once.
pub type SpecKeySet = BTreeSet<String>;

/// Collect every specification key defined by any of `items`.
pub fn extract_keys(items: &[ComparableItem]) -> SpecKeySet {
    items
        .iter()
        .flat_map(|item| item.specifications.keys())
        .cloned()
        .collect()
}

fn priority_index(key: &str) -> Option<usize> {
    SPEC_PRIORITY.iter().position(|p| *p == key)
}

/// Compare two keys for display.
///
/// Prioritized keys come first in list order; unlisted keys follow in
/// case-sensitive lexicographic order.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (priority_index(a), priority_index(b)) {
        (Some(ia), Some(ib)) => ia.cmp(&ib),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Produce the display order for a key set.
pub fn sort_keys<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<String> = keys.into_iter().cloned().collect();
    sorted.sort_by(|a, b| compare_keys(a, b));
    sorted
}
