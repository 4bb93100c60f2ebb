//! SmartGEMBA inspection-tree migration
//!
//! Turns flat inspection-tree exports into linked location, equipment and
//! inspection-item records and writes them to each facility's store,
//! checkpointing after every facility.

pub mod classify;
pub mod driver;
pub mod error;
pub mod hierarchy;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod memory;

pub use driver::{
    FacilityOutcome, MigrationDriver, MigrationOptions, MigrationProgress, MigrationReport,
    MigrationStatus, read_progress, reset_progress,
};
pub use error::MigrationError;
pub use store::{
    CheckpointStore, DatasetSource, FacilityDescriptor, FacilityRegistry, RecordStore, StoreOpener,
};
pub use types::*;
