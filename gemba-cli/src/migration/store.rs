//! Collaborator interfaces the migration driver depends on
//!
//! Everything that touches files or databases sits behind one of these
//! traits so the driver can be exercised with in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{DatasetCatalog, RecordBatch, RecordKind};

/// Well-known checkpoint keys
pub mod keys {
    pub const LAST_PROCESSED_FACILITY: &str = "SG_LAST_PROCESSED_FACILITY_INDEX";
    pub const MIGRATION_STATUS: &str = "SG_MIGRATION_STATUS";
}

/// One row of the facility registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityDescriptor {
    /// Facility_ID, empty when the registry cell is blank
    pub facility_id: String,
    /// Display name used for dataset matching
    pub name: String,
    /// Handle of the facility's record store, empty when unset
    pub store_handle: String,
}

impl FacilityDescriptor {
    pub fn new(
        facility_id: impl Into<String>,
        name: impl Into<String>,
        store_handle: impl Into<String>,
    ) -> Self {
        FacilityDescriptor {
            facility_id: facility_id.into(),
            name: name.into(),
            store_handle: store_handle.into(),
        }
    }

    /// Facilities without an ID or store cannot be migrated
    pub fn is_migratable(&self) -> bool {
        !self.facility_id.is_empty() && !self.store_handle.is_empty()
    }
}

/// Produces the CSV datasets for a run
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> Result<DatasetCatalog>;
}

/// Ordered list of facilities to migrate
#[async_trait]
pub trait FacilityRegistry: Send + Sync {
    async fn facilities(&self) -> Result<Vec<FacilityDescriptor>>;
}

/// Per-facility record storage
#[async_trait]
pub trait RecordStore: Send {
    /// Remove every record of a kind
    async fn clear(&mut self, kind: RecordKind) -> Result<()>;

    /// Write a batch of records, replacing any previous content of its kind
    async fn write_records(&mut self, batch: RecordBatch<'_>) -> Result<()>;

    /// Persist pending changes
    async fn flush(&mut self) -> Result<()>;
}

/// Resolves store handles to record stores
#[async_trait]
pub trait StoreOpener: Send + Sync {
    async fn open(&self, handle: &str) -> Result<Box<dyn RecordStore>>;
}

/// Durable string properties used for checkpoints
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
