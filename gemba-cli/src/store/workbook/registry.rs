//! Facility registry read from the master workbook

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use super::{Cell, SheetData, read_workbook};
use crate::migration::{FacilityDescriptor, FacilityRegistry, MigrationError};

const FACILITIES_SHEET: &str = "M_Facilities";

/// Required header names on the facilities sheet
mod cols {
    pub const FACILITY_ID: &str = "Facility_ID";
    pub const NAME: &str = "Name";
    pub const DB_FILE_ID: &str = "DB_File_ID";
}

/// `M_Facilities` sheet of the master workbook
#[derive(Debug, Clone)]
pub struct WorkbookRegistry {
    path: PathBuf,
}

impl WorkbookRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WorkbookRegistry { path: path.into() }
    }
}

#[async_trait]
impl FacilityRegistry for WorkbookRegistry {
    async fn facilities(&self) -> Result<Vec<FacilityDescriptor>> {
        let data = read_workbook(&self.path)?;
        let sheet = data
            .sheet(FACILITIES_SHEET)
            .ok_or_else(|| MigrationError::MissingSheet {
                workbook: self.path.display().to_string(),
                sheet: FACILITIES_SHEET.to_string(),
            })?;

        let facilities = parse_facilities(sheet)?;
        log::info!(
            "Read {} facilities from {}",
            facilities.len(),
            self.path.display()
        );
        Ok(facilities)
    }
}

/// Parse registry rows by header name. Every data row yields a descriptor,
/// blank ones included, so row positions stay stable for checkpoints.
fn parse_facilities(sheet: &SheetData) -> Result<Vec<FacilityDescriptor>, MigrationError> {
    let column = |name: &str| {
        sheet
            .column_index(name)
            .ok_or_else(|| MigrationError::MissingColumn {
                sheet: sheet.name.clone(),
                column: name.to_string(),
            })
    };

    let id_idx = column(cols::FACILITY_ID)?;
    let name_idx = column(cols::NAME)?;
    let db_idx = column(cols::DB_FILE_ID)?;

    Ok(sheet
        .data_rows()
        .iter()
        .map(|row| {
            FacilityDescriptor::new(cell(row, id_idx), cell(row, name_idx), cell(row, db_idx))
        })
        .collect())
}

fn cell(row: &[Cell], idx: usize) -> String {
    row.get(idx).map(|c| c.text().trim().to_string()).unwrap_or_default()
}
