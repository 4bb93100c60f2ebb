//! Per-facility workbook acting as a record store

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{WorkbookData, read_workbook, text_row, write_workbook};
use crate::migration::{RecordBatch, RecordKind, RecordStore, StoreOpener};

/// Resolve a `DB_File_ID` against the master workbook's folder.
///
/// Handles without an extension get `.xlsx`.
fn resolve_handle(base_dir: &Path, handle: &str) -> PathBuf {
    let path = Path::new(handle.trim());
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };

    if path.extension().is_none() {
        path.with_extension("xlsx")
    } else {
        path
    }
}

/// A facility workbook with `M_Locations`, `M_Equipment` and
/// `M_Inspection_Items` sheets.
///
/// Changes stay in memory until [`RecordStore::flush`], which rewrites the
/// file once.
#[derive(Debug)]
pub struct WorkbookRecordStore {
    path: PathBuf,
    data: WorkbookData,
    dirty: bool,
}

impl WorkbookRecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            bail!("Facility workbook does not exist: {}", path.display());
        }
        let data = read_workbook(&path)?;
        log::debug!(
            "Opened {} (sheets: {})",
            path.display(),
            data.sheet_names().join(", ")
        );
        Ok(WorkbookRecordStore {
            path,
            data,
            dirty: false,
        })
    }

    #[cfg(test)]
    pub fn data(&self) -> &WorkbookData {
        &self.data
    }
}

#[async_trait]
impl RecordStore for WorkbookRecordStore {
    async fn clear(&mut self, kind: RecordKind) -> Result<()> {
        let Some(sheet) = self.data.sheet_mut(kind.sheet_name()) else {
            log::warn!(
                "{} has no {} sheet, nothing to clear",
                self.path.display(),
                kind.sheet_name()
            );
            return Ok(());
        };

        if sheet.rows.len() <= 1 {
            return Ok(());
        }
        let removed = sheet.rows.len() - 1;
        sheet.rows.truncate(1);
        self.dirty = true;

        log::debug!("Cleared {} rows from {}", removed, kind.sheet_name());
        Ok(())
    }

    async fn write_records(&mut self, batch: RecordBatch<'_>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let kind = batch.kind();
        let Some(sheet) = self.data.sheet_mut(kind.sheet_name()) else {
            log::warn!(
                "{} has no {} sheet, {} records not written",
                self.path.display(),
                kind.sheet_name(),
                batch.len()
            );
            return Ok(());
        };

        if sheet.headers().is_empty() {
            let defaults = text_row(kind.default_headers().iter().map(|h| h.to_string()).collect());
            if sheet.rows.is_empty() {
                sheet.rows.push(defaults);
            } else {
                sheet.rows[0] = defaults;
            }
        }

        let rows = batch.to_rows(&sheet.headers());
        sheet.rows.truncate(1);
        sheet.rows.extend(rows.into_iter().map(text_row));
        self.dirty = true;

        log::debug!("Wrote {} rows to {}", batch.len(), kind.sheet_name());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        write_workbook(&self.data, &self.path)?;
        self.dirty = false;
        log::debug!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Opens facility workbooks relative to the master workbook's folder
#[derive(Debug, Clone)]
pub struct WorkbookStoreOpener {
    base_dir: PathBuf,
}

impl WorkbookStoreOpener {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        WorkbookStoreOpener {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl StoreOpener for WorkbookStoreOpener {
    async fn open(&self, handle: &str) -> Result<Box<dyn RecordStore>> {
        let path = resolve_handle(&self.base_dir, handle);
        Ok(Box::new(WorkbookRecordStore::open(path)?))
    }
}
