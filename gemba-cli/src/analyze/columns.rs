use std::collections::BTreeSet;
use std::fmt::Write;

use serde::Serialize;

use crate::config::TargetColumn;
use crate::migration::{RawRow, field_at};

/// Which half of the header row a column sits in. Equipment exports repeat
/// some names in a second, device-level section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPosition {
    FirstHalf,
    SecondHalf,
}

impl ColumnPosition {
    fn of(index: usize, header_len: usize) -> Self {
        if index < header_len / 2 {
            ColumnPosition::FirstHalf
        } else {
            ColumnPosition::SecondHalf
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnPosition::FirstHalf => "前半(設備)",
            ColumnPosition::SecondHalf => "後半(機器)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnValues {
    pub index: usize,
    pub position: ColumnPosition,
    /// Distinct non-empty trimmed values, sorted
    pub values: Vec<String>,
}

/// Unique values of every column carrying one target name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSurvey {
    pub name: String,
    pub description: String,
    /// Empty when the header has no such column
    pub columns: Vec<ColumnValues>,
}

impl ColumnSurvey {
    pub fn is_found(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// Survey each target column. The first row is the header.
pub fn survey_columns(rows: &[RawRow], targets: &[TargetColumn]) -> Vec<ColumnSurvey> {
    let (headers, data) = match rows.split_first() {
        Some((headers, data)) => (headers.as_slice(), data),
        None => (&[][..], &[][..]),
    };

    targets
        .iter()
        .map(|target| {
            let columns: Vec<ColumnValues> = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| h.trim() == target.name)
                .map(|(index, _)| ColumnValues {
                    index,
                    position: ColumnPosition::of(index, headers.len()),
                    values: unique_values(data, index),
                })
                .collect();

            if columns.is_empty() {
                log::warn!("Column '{}' not found in header", target.name);
            }

            ColumnSurvey {
                name: target.name.clone(),
                description: target.description.clone(),
                columns,
            }
        })
        .collect()
}

fn unique_values(rows: &[RawRow], index: usize) -> Vec<String> {
    rows.iter()
        .map(|row| field_at(row, index))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Plain-text report: column list followed by every survey
pub fn render_column_report(rows: &[RawRow], surveys: &[ColumnSurvey]) -> String {
    let headers = rows.first().map(|r| r.as_slice()).unwrap_or(&[]);
    let mut out = String::new();

    let _ = writeln!(out, "=== Column survey ===");
    let _ = writeln!(out, "Data rows: {}", rows.len().saturating_sub(1));
    let _ = writeln!(out, "Columns: {}", headers.len());
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Columns ---");
    for (idx, header) in headers.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", idx, header);
    }

    for survey in surveys {
        let _ = writeln!(out);
        if !survey.is_found() {
            let _ = writeln!(out, "▶ 【{}】 not found", survey.name);
            continue;
        }
        for column in &survey.columns {
            let _ = writeln!(
                out,
                "▶ 【{}】 (column [{}], {})",
                survey.name,
                column.index,
                column.position.label()
            );
            let _ = writeln!(out, "  Unique values: {}", column.values.len());
            for value in &column.values {
                let _ = writeln!(out, "    - {}", value);
            }
        }
    }

    out
}
