//! Plain-text rendering of comparison tables and saved comparison lists.

use compara_core::SavedComparison;
use compara_core::table::ComparisonTable;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const MISSING: &str = "-";
const MAX_CELL_WIDTH: usize = 36;

fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Render a table with one column per product. The best column header is
/// marked with `*`.
pub fn render_table(table: &ComparisonTable) -> String {
    let headers: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let name = truncate(&c.name, MAX_CELL_WIDTH - 2);
            if c.highlighted {
                format!("{name} *")
            } else {
                name
            }
        })
        .collect();
    let body: Vec<(String, Vec<String>)> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|c| truncate(c.as_deref().unwrap_or(MISSING), MAX_CELL_WIDTH))
                .collect();
            (row.label.clone(), cells)
        })
        .collect();

    let label_width = body
        .iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            body.iter()
                .map(|(_, cells)| cells[idx].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let mut line = pad("", label_width);
    for (header, width) in headers.iter().zip(&col_widths) {
        line.push_str(" | ");
        line.push_str(&pad(header, *width));
    }
    let _ = writeln!(out, "{}", line.trim_end());
    let rule_len = label_width + col_widths.iter().map(|w| w + 3).sum::<usize>();
    let _ = writeln!(out, "{}", "-".repeat(rule_len));

    for (label, cells) in &body {
        let mut line = pad(label, label_width);
        for (cell, width) in cells.iter().zip(&col_widths) {
            line.push_str(" | ");
            line.push_str(&pad(cell, *width));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if table.best.is_some() {
        let _ = writeln!(out, "\n* best rated");
    }
    out
}

/// One line per saved comparison: id, name, item count, creation date.
pub fn render_saved_list(saved: &[SavedComparison]) -> String {
    let id_width = saved.iter().map(|s| s.id.width()).max().unwrap_or(0);
    let name_width = saved
        .iter()
        .map(|s| truncate(&s.name, MAX_CELL_WIDTH).width())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for s in saved {
        let created = s
            .created_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| s.date_created.clone());
        let _ = writeln!(
            out,
            "{}  {}  {} items  {}",
            pad(&s.id, id_width),
            pad(&truncate(&s.name, MAX_CELL_WIDTH), name_width),
            s.product_ids.len(),
            created
        );
    }
    out
}
