use std::collections::BTreeSet;
use std::fmt::Write;

use crate::migration::{RawRow, field_at};

/// Column holding the inspection type in inspection exports
pub const DEFAULT_INSPECTION_TYPE_COLUMN: usize = 11;

/// Stands in for blank values in the inspection-type report
pub const EMPTY_VALUE_LABEL: &str = "(空文字)";

const INSPECTION_ROW_TYPES: &[&str] = &["04点検", "04点検項目"];

/// Distinct values of `column` over inspection rows, sorted.
///
/// Only rows whose type field is exactly one of the inspection row types
/// count. Rows too short for the column are skipped, blank values are
/// reported as [`EMPTY_VALUE_LABEL`].
pub fn inspection_types(rows: &[RawRow], column: usize) -> Vec<String> {
    rows.iter()
        .filter(|row| {
            let row_type = field_at(row, 0);
            INSPECTION_ROW_TYPES.iter().any(|t| *t == row_type)
        })
        .filter(|row| column < row.len())
        .map(|row| match field_at(row, column) {
            "" => EMPTY_VALUE_LABEL.to_string(),
            value => value.to_string(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn render_inspection_types(total_rows: usize, column: usize, values: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total rows: {}", total_rows);
    let _ = writeln!(out, "=== Inspection types (column {}) ===", column);
    for value in values {
        let _ = writeln!(out, "- {}", value);
    }
    out
}

/// Header row plus the first few data rows of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPreview {
    pub headers: RawRow,
    pub rows: Vec<RawRow>,
    pub total_rows: usize,
}

impl HeaderPreview {
    pub fn new(rows: &[RawRow], limit: usize) -> Self {
        let (headers, data) = match rows.split_first() {
            Some((headers, data)) => (headers.clone(), data),
            None => (Vec::new(), &[][..]),
        };
        HeaderPreview {
            headers,
            rows: data.iter().take(limit).cloned().collect(),
            total_rows: rows.len(),
        }
    }
}

pub fn render_header_preview(preview: &HeaderPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Header row: {:?}", preview.headers);
    for (idx, row) in preview.rows.iter().enumerate() {
        let _ = writeln!(out, "Data row {}: {:?}", idx + 1, row);
    }
    let _ = writeln!(out, "Total rows: {}", preview.total_rows);
    out
}
