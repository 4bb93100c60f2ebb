//! In-memory collaborators for driver tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::store::{
    CheckpointStore, DatasetSource, FacilityDescriptor, FacilityRegistry, RecordStore, StoreOpener,
};
use super::types::{DatasetCatalog, RecordBatch, RecordKind};

pub struct MemoryDatasetSource {
    catalog: DatasetCatalog,
}

impl MemoryDatasetSource {
    pub fn new(catalog: DatasetCatalog) -> Self {
        MemoryDatasetSource { catalog }
    }
}

#[async_trait]
impl DatasetSource for MemoryDatasetSource {
    async fn load(&self) -> Result<DatasetCatalog> {
        Ok(self.catalog.clone())
    }
}

pub struct MemoryRegistry {
    facilities: Vec<FacilityDescriptor>,
}

impl MemoryRegistry {
    pub fn new(facilities: Vec<FacilityDescriptor>) -> Self {
        MemoryRegistry { facilities }
    }
}

#[async_trait]
impl FacilityRegistry for MemoryRegistry {
    async fn facilities(&self) -> Result<Vec<FacilityDescriptor>> {
        Ok(self.facilities.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Rendered rows per record kind for one facility
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    rows: HashMap<RecordKind, Vec<Vec<String>>>,
    flushes: usize,
}

impl MemoryTables {
    /// Number of times the store was flushed
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn rows(&self, kind: RecordKind) -> &[Vec<String>] {
        self.rows.get(&kind).map(|r| r.as_slice()).unwrap_or(&[])
    }
}

type SharedTables = Arc<Mutex<HashMap<String, MemoryTables>>>;

struct MemoryRecordStore {
    handle: String,
    tables: SharedTables,
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn clear(&mut self, kind: RecordKind) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(self.handle.clone())
            .or_default()
            .rows
            .insert(kind, Vec::new());
        Ok(())
    }

    async fn write_records(&mut self, batch: RecordBatch<'_>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let headers: Vec<String> = batch
            .kind()
            .default_headers()
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows = batch.to_rows(&headers);

        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(self.handle.clone())
            .or_default()
            .rows
            .insert(batch.kind(), rows);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(self.handle.clone()).or_default().flushes += 1;
        Ok(())
    }
}

/// Opens in-memory stores, optionally refusing one handle
#[derive(Default)]
pub struct MemoryStoreOpener {
    tables: SharedTables,
    opened: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
}

impl MemoryStoreOpener {
    pub fn fail_on(&self, handle: &str) {
        *self.fail_on.lock().unwrap() = Some(handle.to_string());
    }

    pub fn clear_failure(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    /// Handles successfully opened, in order
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn tables(&self, handle: &str) -> Option<MemoryTables> {
        self.tables.lock().unwrap().get(handle).cloned()
    }
}

#[async_trait]
impl StoreOpener for MemoryStoreOpener {
    async fn open(&self, handle: &str) -> Result<Box<dyn RecordStore>> {
        if self.fail_on.lock().unwrap().as_deref() == Some(handle) {
            bail!("store {} is unreachable", handle);
        }
        self.opened.lock().unwrap().push(handle.to_string());
        Ok(Box::new(MemoryRecordStore {
            handle: handle.to_string(),
            tables: Arc::clone(&self.tables),
        }))
    }
}
