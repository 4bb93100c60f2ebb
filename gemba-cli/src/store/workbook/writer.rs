//! Write typed rows back to a workbook

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, Formula, RowNum, Workbook, Worksheet, XlsxError};

use super::{Cell, WorkbookData};

/// Number formats for date cells, whose original format is not read back
struct DateFormats {
    datetime: Format,
    duration: Format,
}

impl DateFormats {
    fn new() -> Self {
        DateFormats {
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// Write every sheet to `path`, replacing the file.
///
/// The workbook is saved next to the target first and renamed over it, so
/// an interrupted save leaves the previous file intact.
pub fn write_workbook(data: &WorkbookData, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let formats = DateFormats::new();

    for sheet in &data.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, row_idx as RowNum, col_idx as ColNum, cell, &formats)
                    .with_context(|| {
                        format!("Failed to write {}!R{}C{}", sheet.name, row_idx + 1, col_idx + 1)
                    })?;
            }
        }
    }

    let staging = path.with_extension("xlsx.tmp");
    workbook
        .save(&staging)
        .with_context(|| format!("Failed to save Excel file: {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to replace Excel file: {}", path.display()))?;

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
    formats: &DateFormats,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Empty => return Ok(()),
        Cell::Text(s) if s.is_empty() => return Ok(()),
        Cell::Text(s) => worksheet.write_string(row, col, s)?,
        Cell::Number(n) => worksheet.write_number(row, col, *n)?,
        Cell::Bool(b) => worksheet.write_boolean(row, col, *b)?,
        Cell::DateTime { serial, duration } => {
            let format = if *duration {
                &formats.duration
            } else {
                &formats.datetime
            };
            worksheet.write_number_with_format(row, col, *serial, format)?
        }
        Cell::Formula { formula, cached } => {
            worksheet.write_formula(row, col, Formula::new(formula).set_result(cached))?
        }
    };
    Ok(())
}
