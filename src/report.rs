//! Dataset checks printed by the `check` command.
//!
//! Produces a per-column missing-value summary and a preview of the first
//! rows, both rendered as plain aligned text.

use std::fmt::Write as _;

use crate::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnNulls {
    pub column: String,
    pub nulls: usize,
    pub percent: f64,
}

pub fn null_summary(table: &Table) -> Vec<ColumnNulls> {
    let rows = table.row_count();
    table
        .headers()
        .iter()
        .zip(table.null_counts())
        .map(|(column, nulls)| ColumnNulls {
            column: column.clone(),
            nulls,
            percent: if rows == 0 {
                0.0
            } else {
                nulls as f64 * 100.0 / rows as f64
            },
        })
        .collect()
}

pub fn render_null_summary(summary: &[ColumnNulls]) -> String {
    let headers = ["column", "nulls", "percent"].map(String::from);
    let rows = summary
        .iter()
        .map(|entry| {
            vec![
                entry.column.clone(),
                entry.nulls.to_string(),
                format!("{:.2}", entry.percent),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

pub fn render_preview(table: &Table, limit: usize) -> String {
    let rows = table
        .rows()
        .iter()
        .take(limit)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect::<Vec<Vec<String>>>();
    render_table(table.headers(), &rows)
}

/// Renders `rows` under `headers` with two spaces between columns and a
/// dashed rule under the header. Control characters inside cells become
/// spaces so each row stays on one line.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count().max(3))
        .collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| flatten(cell)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    for line in std::iter::once(headers.to_vec())
        .chain(std::iter::once(rule))
        .chain(rows)
    {
        let _ = writeln!(output, "{}", format_line(&line, &widths));
    }
    output
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn flatten(cell: &str) -> String {
    cell.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}
