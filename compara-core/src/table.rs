//! Comparison table assembly.
//!
//! Turns the compared items plus the current visibility state into a grid of
//! display strings: one column per item, a fixed block of summary rows, then
//! one row per visible specification key in priority order.

use crate::best::best_index;
use crate::routing::Router;
use crate::types::ComparableItem;
use crate::visibility::VisibilityMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Price,
    Rating,
    Reviews,
    Spec,
    Features,
    Pros,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub detail_path: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub label: String,
    pub kind: RowKind,
    /// One cell per column; `None` where the item has no value.
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Column index of the highlighted best item.
    pub best: Option<usize>,
}

impl ComparisonTable {
    pub fn build(
        items: &[ComparableItem],
        visibility: &VisibilityMap,
        highlight: bool,
        router: &Router,
    ) -> Self {
        let best = best_index(items, highlight);
        let columns = items
            .iter()
            .enumerate()
            .map(|(idx, item)| Column {
                id: item.id.to_string(),
                name: item.name.clone(),
                detail_path: router.detail_path(item),
                highlighted: best == Some(idx),
            })
            .collect();

        let mut rows = vec![
            summary_row("Price", RowKind::Price, items, |i| {
                Some(format!("${:.2}", i.price))
            }),
            summary_row("Rating", RowKind::Rating, items, |i| {
                Some(format!("{:.1} / 5", i.rating))
            }),
            summary_row("Reviews", RowKind::Reviews, items, |i| {
                Some(i.review_count.to_string())
            }),
        ];
        rows.extend(visibility.visible_keys().into_iter().map(|key| Row {
            cells: items.iter().map(|i| i.spec(&key).map(str::to_string)).collect(),
            label: key,
            kind: RowKind::Spec,
        }));
        rows.push(summary_row("Features", RowKind::Features, items, |i| {
            joined(&i.features)
        }));
        rows.push(summary_row("Pros", RowKind::Pros, items, |i| joined(&i.pros)));

        Self {
            columns,
            rows,
            best,
        }
    }

    /// Only the specification rows.
    pub fn spec_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.kind == RowKind::Spec)
    }
}

fn summary_row<F>(label: &str, kind: RowKind, items: &[ComparableItem], cell: F) -> Row
where
    F: Fn(&ComparableItem) -> Option<String>,
{
    Row {
        label: label.to_string(),
        kind,
        cells: items.iter().map(cell).collect(),
    }
}

fn joined(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}
