//! Best-rated item selection for column highlighting.

use crate::types::{ComparableItem, ItemId};

/// Identifier of the highest-rated item, or `None` when highlighting is off or
/// there is nothing to compare. Ties go to the item listed first.
pub fn select_best(items: &[ComparableItem], highlight: bool) -> Option<ItemId> {
    best_index(items, highlight).map(|idx| items[idx].id.clone())
}

/// Position of the best item within `items`, same rules as [`select_best`].
pub fn best_index(items: &[ComparableItem], highlight: bool) -> Option<usize> {
    if !highlight {
        return None;
    }
    let mut best: Option<usize> = None;
    for (idx, item) in items.iter().enumerate() {
        match best {
            // only a strictly greater rating displaces the leader
            Some(leader) if rank(item) <= rank(&items[leader]) => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Rating used for ranking. NaN ranks below every real rating.
fn rank(item: &ComparableItem) -> f64 {
    if item.rating.is_nan() {
        f64::NEG_INFINITY
    } else {
        item.rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(id: i64, rating: f64) -> ComparableItem {
        ComparableItem::new(id, format!("Item {id}")).with_rating(rating)
    }

    #[test]
    fn test_highest_rating_wins() {
        let items = vec![rated(1, 4.5), rated(2, 4.5), rated(3, 4.9)];
        assert_eq!(select_best(&items, true), Some(ItemId::Number(3)));
    }

    #[test]
    fn test_tie_goes_to_first_in_list() {
        let items = vec![rated(1, 4.5), rated(2, 4.5)];
        assert_eq!(select_best(&items, true), Some(ItemId::Number(1)));
        let reversed = vec![rated(2, 4.5), rated(1, 4.5)];
        assert_eq!(select_best(&reversed, true), Some(ItemId::Number(2)));
    }

    #[test]
    fn test_disabled_or_empty_returns_none() {
        let items = vec![rated(1, 5.0)];
        assert_eq!(select_best(&items, false), None);
        assert_eq!(select_best(&[], true), None);
    }

    #[test]
    fn test_nan_ratings_never_panic() {
        let items = vec![rated(1, f64::NAN), rated(2, 3.0)];
        assert_eq!(select_best(&items, true), Some(ItemId::Number(2)));
        let all_nan = vec![rated(1, f64::NAN), rated(2, f64::NAN)];
        assert_eq!(select_best(&all_nan, true), Some(ItemId::Number(1)));

        let many: Vec<ComparableItem> = (0..64)
            .map(|i| {
                let rating = if i % 3 == 0 { f64::NAN } else { (i % 7) as f64 * 0.5 };
                rated(i, rating)
            })
            .collect();
        // first item rated 3.0 (6 * 0.5) is id 13
        assert_eq!(select_best(&many, true), Some(ItemId::Number(13)));
    }

    #[test]
    fn test_best_index_matches_select() {
        let items = vec![rated(1, 2.0), rated(2, 4.0), rated(3, 1.0)];
        assert_eq!(best_index(&items, true), Some(1));
    }
}
