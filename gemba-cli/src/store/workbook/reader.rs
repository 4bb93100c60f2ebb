//! Read a workbook into typed cell rows

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use super::{Cell, SheetData, WorkbookData};

/// Read every sheet of an `.xlsx` file, formulas included
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let mut data = WorkbookData::default();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;
        let formulas = workbook
            .worksheet_formula(&name)
            .with_context(|| format!("Failed to read formulas of sheet: {}", name))?;

        let mut rows = range_rows(&range);
        apply_formulas(&mut rows, &formulas);
        data.sheets.push(SheetData::new(name, rows));
    }

    Ok(data)
}

/// Convert a calamine range to rows anchored at A1.
///
/// calamine ranges start at the first used cell, so leading blank rows and
/// columns are restored here to keep column indices stable.
fn range_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<Cell>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(to_cell));
        while cells.last().is_some_and(Cell::is_empty) {
            cells.pop();
        }
        rows.push(cells);
    }

    rows
}

/// Replace cells holding a formula with the formula and its cached value
fn apply_formulas(rows: &mut Vec<Vec<Cell>>, formulas: &Range<String>) {
    let Some((start_row, start_col)) = formulas.start() else {
        return;
    };

    for (r, c, formula) in formulas.used_cells() {
        let row_idx = start_row as usize + r;
        let col_idx = start_col as usize + c;

        if rows.len() <= row_idx {
            rows.resize_with(row_idx + 1, Vec::new);
        }
        let row = &mut rows[row_idx];
        if row.len() <= col_idx {
            row.resize(col_idx + 1, Cell::Empty);
        }

        let cached = row[col_idx].text();
        row[col_idx] = Cell::Formula {
            formula: formula.clone(),
            cached,
        };
    }
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime {
            serial: dt.as_f64(),
            duration: dt.is_duration(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // Error values cannot be written back as such
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::Empty => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Workbook};
    use uuid::Uuid;

    #[test]
    fn test_range_rows_restores_offset() {
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("ID".into()));
        range.set_value((2, 2), Data::Float(7.0));

        let rows = range_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1], vec![Cell::Empty, Cell::Text("ID".into())]);
        assert_eq!(rows[2], vec![Cell::Empty, Cell::Empty, Cell::Number(7.0)]);
    }

    #[test]
    fn test_reads_typed_cells_and_formulas() {
        let path = std::env::temp_dir().join(format!("gemba-cli-typed-{}.xlsx", Uuid::new_v4()));
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Settings").unwrap();
        sheet.write_number(0, 0, 42.0).unwrap();
        sheet.write_formula(0, 1, "=A1*2").unwrap();
        sheet.write_boolean(0, 2, true).unwrap();
        sheet
            .write_number_with_format(1, 0, 45000.0, &Format::new().set_num_format("yyyy-mm-dd"))
            .unwrap();
        sheet.write_string(1, 1, "memo").unwrap();
        workbook.save(&path).unwrap();

        let data = read_workbook(&path).unwrap();
        let rows = &data.sheet("Settings").unwrap().rows;

        assert_eq!(rows[0][0], Cell::Number(42.0));
        assert!(matches!(&rows[0][1], Cell::Formula { formula, .. } if formula == "A1*2"));
        assert_eq!(rows[0][2], Cell::Bool(true));
        assert!(matches!(rows[1][0], Cell::DateTime { serial, duration: false } if serial == 45000.0));
        assert_eq!(rows[1][1], Cell::Text("memo".into()));

        std::fs::remove_file(&path).unwrap();
    }
}
