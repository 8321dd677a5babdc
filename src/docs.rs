//! Markdown documentation of every marker found in the input.

use itertools::Itertools;

use crate::traits::Row;

pub const DOCUMENTATION_MARKDOWN_HEADER: &str = "# Policy Justification\n\nThis file contains justification for access policies needed by this project.\n\n";

pub const HEADER_EFFECT: &str = "effect";
pub const HEADER_PERMISSION: &str = "permission";
pub const HEADER_RESOURCE: &str = "resource";
pub const HEADER_REASON: &str = "reason";
pub const HEADER_CONDITION: &str = "condition";

/// The table header. Column order matches [`Row::columns`].
pub fn header() -> [&'static str; 5] {
    [
        HEADER_EFFECT,
        HEADER_PERMISSION,
        HEADER_RESOURCE,
        HEADER_REASON,
        HEADER_CONDITION,
    ]
}

/// Render the full documentation file: the fixed header followed by one
/// table row per marker, in input order.
pub fn render<R: Row>(rows: &[R]) -> String {
    let header = header().map(String::from);
    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|row| row.columns().map(|cell| escape(&cell)))
        .collect();

    let widths: [usize; 5] = std::array::from_fn(|i| {
        std::iter::once(&header)
            .chain(body.iter())
            .map(|cells| cells[i].chars().count())
            .max()
            .unwrap_or_default()
    });

    let mut out = String::from(DOCUMENTATION_MARKDOWN_HEADER);
    out.push_str(&table_line(&header, &widths));
    out.push_str(&format!(
        "|{}|\n",
        widths.iter().map(|w| "-".repeat(w + 2)).join("|")
    ));
    for cells in &body {
        out.push_str(&table_line(cells, &widths));
    }
    out
}

fn table_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {cell:<width$} "))
        .join("|");
    format!("|{line}|\n")
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}
