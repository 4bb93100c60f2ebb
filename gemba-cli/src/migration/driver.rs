//! Resumable per-facility migration
//!
//! Facilities are processed strictly in registry order. After each facility
//! the driver records its index as a checkpoint, so a run that fails halfway
//! picks up at the next facility when invoked again.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::MigrationError;
use super::hierarchy::{build_hierarchy, facility_code};
use super::store::{
    CheckpointStore, DatasetSource, FacilityDescriptor, FacilityRegistry, StoreOpener, keys,
};
use super::types::{ColumnLayout, DatasetCatalog, RecordKind};
use crate::services::matching::find_dataset;

/// Facility that still uses the older export shape
pub const DEFAULT_LEGACY_FACILITY_ID: &str = "F-007";

/// Overall migration status stored next to the checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MigrationStatus {
    MasterCompleted,
    Completed,
}

impl MigrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationStatus::MasterCompleted => "MASTER_COMPLETED",
            MigrationStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MASTER_COMPLETED" => Some(MigrationStatus::MasterCompleted),
            "COMPLETED" => Some(MigrationStatus::Completed),
            _ => None,
        }
    }
}

/// Persisted progress of the current or last run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationProgress {
    /// Index of the last facility fully migrated
    pub last_processed: Option<usize>,
    /// Raw status value, kept as-is so unknown values can still be shown
    pub status: Option<String>,
}

impl MigrationProgress {
    pub fn status(&self) -> Option<MigrationStatus> {
        self.status.as_deref().and_then(MigrationStatus::parse)
    }

    /// First facility index the next run will process
    pub fn resume_index(&self) -> usize {
        self.last_processed.map_or(0, |i| i + 1)
    }
}

/// Read the last processed facility index. Negative values mean "not started".
pub async fn read_checkpoint(store: &dyn CheckpointStore) -> Result<Option<usize>> {
    let Some(raw) = store.get(keys::LAST_PROCESSED_FACILITY).await? else {
        return Ok(None);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| MigrationError::InvalidCheckpoint { value: raw.clone() })?;

    Ok(usize::try_from(value).ok())
}

pub async fn read_progress(store: &dyn CheckpointStore) -> Result<MigrationProgress> {
    Ok(MigrationProgress {
        last_processed: read_checkpoint(store).await?,
        status: store.get(keys::MIGRATION_STATUS).await?,
    })
}

/// Forget all progress so the next run starts from the master-data phase
pub async fn reset_progress(store: &dyn CheckpointStore) -> Result<()> {
    store.delete(keys::LAST_PROCESSED_FACILITY).await?;
    store.delete(keys::MIGRATION_STATUS).await?;
    Ok(())
}

/// Driver options
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Facility routed to the legacy path instead of the hierarchy path
    pub legacy_facility_id: String,
    pub layout: ColumnLayout,
    /// Build and count records without touching stores or checkpoints
    pub dry_run: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        MigrationOptions {
            legacy_facility_id: DEFAULT_LEGACY_FACILITY_ID.to_string(),
            layout: ColumnLayout::default(),
            dry_run: false,
        }
    }
}

/// What happened to one facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FacilityOutcome {
    Migrated {
        dataset: String,
        locations: usize,
        equipment: usize,
        inspection_items: usize,
    },
    /// No inspection tree matched the facility name
    NoDataset,
    /// Routed to the legacy path
    Legacy,
    /// Registry row lacks an ID or store handle
    Incomplete,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilityReport {
    pub index: usize,
    pub facility_id: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: FacilityOutcome,
}

/// Summary of one driver run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    /// Checkpoint the run resumed after, if any
    pub resumed_after: Option<usize>,
    pub datasets: usize,
    pub facilities: Vec<FacilityReport>,
}

impl MigrationReport {
    fn new(dry_run: bool) -> Self {
        MigrationReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            resumed_after: None,
            datasets: 0,
            facilities: Vec::new(),
        }
    }

    pub fn migrated_count(&self) -> usize {
        self.facilities
            .iter()
            .filter(|f| matches!(f.outcome, FacilityOutcome::Migrated { .. }))
            .count()
    }

    pub fn count_outcome(&self, outcome: &FacilityOutcome) -> usize {
        self.facilities.iter().filter(|f| &f.outcome == outcome).count()
    }

    pub fn total_records(&self) -> usize {
        self.facilities
            .iter()
            .map(|f| match f.outcome {
                FacilityOutcome::Migrated {
                    locations,
                    equipment,
                    inspection_items,
                    ..
                } => locations + equipment + inspection_items,
                _ => 0,
            })
            .sum()
    }
}

/// Orchestrates a migration run over injected collaborators
pub struct MigrationDriver<'a> {
    source: &'a dyn DatasetSource,
    registry: &'a dyn FacilityRegistry,
    stores: &'a dyn StoreOpener,
    checkpoints: &'a dyn CheckpointStore,
    options: MigrationOptions,
}

impl<'a> MigrationDriver<'a> {
    pub fn new(
        source: &'a dyn DatasetSource,
        registry: &'a dyn FacilityRegistry,
        stores: &'a dyn StoreOpener,
        checkpoints: &'a dyn CheckpointStore,
        options: MigrationOptions,
    ) -> Self {
        MigrationDriver {
            source,
            registry,
            stores,
            checkpoints,
            options,
        }
    }

    /// Run the migration from the stored checkpoint to the end of the registry.
    ///
    /// Any failure is logged here and returned unchanged; the checkpoint of
    /// the last completed facility stays in place.
    pub async fn run(&self) -> Result<MigrationReport> {
        log::info!("Starting SmartGEMBA migration...");
        match self.run_facilities().await {
            Ok(report) => {
                log::info!(
                    "Migration finished: {} facilities migrated, {} records written",
                    report.migrated_count(),
                    report.total_records()
                );
                Ok(report)
            }
            Err(e) => {
                log::error!("Migration failed: {:#}", e);
                Err(e)
            }
        }
    }

    async fn run_facilities(&self) -> Result<MigrationReport> {
        let dry_run = self.options.dry_run;
        let mut report = MigrationReport::new(dry_run);

        let last_processed = read_checkpoint(self.checkpoints).await?;
        report.resumed_after = last_processed;

        let catalog = self
            .source
            .load()
            .await
            .context("Failed to load CSV datasets")?;
        report.datasets = catalog.dataset_count();

        if last_processed.is_none() {
            self.migrate_master_data(&catalog);
            if !dry_run {
                self.checkpoints
                    .set(keys::MIGRATION_STATUS, MigrationStatus::MasterCompleted.as_str())
                    .await?;
            }
        }

        let facilities = self
            .registry
            .facilities()
            .await
            .context("Failed to read facility registry")?;

        let start = last_processed.map_or(0, |i| i + 1);
        if start > 0 {
            log::info!("Resuming at facility index {}", start);
        }

        for (index, facility) in facilities.iter().enumerate().skip(start) {
            if !facility.is_migratable() {
                log::debug!(
                    "Skipping registry row {}: missing Facility_ID or store handle",
                    index
                );
                report.facilities.push(facility_report(index, facility, FacilityOutcome::Incomplete));
                continue;
            }

            log::info!("Processing: {} {}", facility.facility_id, facility.name);

            let outcome = if facility.facility_id == self.options.legacy_facility_id {
                self.migrate_legacy_facility(facility, &catalog);
                FacilityOutcome::Legacy
            } else {
                self.migrate_facility(facility, &catalog)
                    .await
                    .with_context(|| format!("Failed to migrate facility {}", facility.facility_id))?
            };

            if !dry_run {
                self.checkpoints
                    .set(keys::LAST_PROCESSED_FACILITY, &index.to_string())
                    .await?;
            }
            report.facilities.push(facility_report(index, facility, outcome));
        }

        if !dry_run {
            self.checkpoints.delete(keys::LAST_PROCESSED_FACILITY).await?;
            self.checkpoints
                .set(keys::MIGRATION_STATUS, MigrationStatus::Completed.as_str())
                .await?;
        }

        report.finished_at = Some(Utc::now());
        Ok(report)
    }

    /// Replace a facility's records with those built from its inspection tree
    async fn migrate_facility(
        &self,
        facility: &FacilityDescriptor,
        catalog: &DatasetCatalog,
    ) -> Result<FacilityOutcome> {
        let Some(found) = find_dataset(&facility.name, &catalog.hierarchy) else {
            log::warn!(
                "No inspection tree matches {} ({}), skipping",
                facility.facility_id,
                facility.name
            );
            return Ok(FacilityOutcome::NoDataset);
        };

        let code = facility_code(&facility.facility_id);
        let hierarchy = build_hierarchy(
            &found.dataset.rows,
            &facility.facility_id,
            &code,
            self.options.layout,
        );

        log::info!(
            "{}: {} buildings, {} rooms, {} equipment, {} inspection items from {} {}",
            facility.facility_id,
            hierarchy.building_count(),
            hierarchy.room_count(),
            hierarchy.equipment.len(),
            hierarchy.inspection_items.len(),
            found.source_name(),
            found.rule.label()
        );

        if !self.options.dry_run {
            let mut store = self
                .stores
                .open(&facility.store_handle)
                .await
                .with_context(|| format!("Failed to open store {}", facility.store_handle))?;

            for kind in RecordKind::all_variants() {
                store.clear(*kind).await?;
            }
            for batch in hierarchy.batches() {
                store.write_records(batch).await?;
            }
            store
                .flush()
                .await
                .with_context(|| format!("Failed to save store {}", facility.store_handle))?;
        }

        Ok(FacilityOutcome::Migrated {
            dataset: found.source_name().to_string(),
            locations: hierarchy.locations.len(),
            equipment: hierarchy.equipment.len(),
            inspection_items: hierarchy.inspection_items.len(),
        })
    }

    /// Master data is maintained by hand in the master workbook; this phase
    /// only reports what the export folder contained.
    fn migrate_master_data(&self, catalog: &DatasetCatalog) {
        log::info!(
            "Master data phase: {} inspection trees, facilities table {}, equipment table {}",
            catalog.dataset_count(),
            table_summary(catalog.legacy.facilities.as_deref()),
            table_summary(catalog.legacy.equipment.as_deref()),
        );
    }

    // TODO: map the 施設情報/設備情報 tables onto locations and equipment once
    // the legacy column layout is confirmed.
    fn migrate_legacy_facility(&self, facility: &FacilityDescriptor, catalog: &DatasetCatalog) {
        log::info!(
            "Legacy migration: {} ({} equipment rows available)",
            facility.facility_id,
            catalog.legacy.equipment.as_ref().map_or(0, |rows| rows.len())
        );
    }
}

fn facility_report(
    index: usize,
    facility: &FacilityDescriptor,
    outcome: FacilityOutcome,
) -> FacilityReport {
    FacilityReport {
        index,
        facility_id: facility.facility_id.clone(),
        name: facility.name.clone(),
        outcome,
    }
}

fn table_summary(rows: Option<&[Vec<String>]>) -> String {
    match rows {
        Some(rows) => format!("{} rows", rows.len()),
        None => "missing".to_string(),
    }
}
