//! Migrate command handler

use anyhow::{Context, Result};
use colored::*;

use super::MigrateArgs;
use crate::config::Config;
use crate::config::repository::{self, SqliteCheckpointStore};
use crate::migration::{FacilityOutcome, MigrationDriver, MigrationOptions, MigrationReport};
use crate::source::FolderDatasetSource;
use crate::store::{WorkbookRegistry, WorkbookStoreOpener};

pub async fn handle_migrate_command(args: MigrateArgs, config: &Config) -> Result<()> {
    log::debug!(
        "CSV folder: {}, master workbook: {}, state: {}",
        config.csv_dir.display(),
        config.master_db.display(),
        config.state_db.display()
    );

    let pool = repository::connect(&config.state_db).await?;
    let checkpoints = SqliteCheckpointStore::new(pool);
    let source = FolderDatasetSource::new(&config.csv_dir);
    let registry = WorkbookRegistry::new(&config.master_db);
    let stores = WorkbookStoreOpener::new(config.store_dir());

    let options = MigrationOptions {
        legacy_facility_id: config.legacy_facility_id.clone(),
        layout: config.layout,
        dry_run: args.dry_run,
    };

    let driver = MigrationDriver::new(&source, &registry, &stores, &checkpoints, options);
    let report = driver.run().await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &MigrationReport) {
    println!();
    if report.dry_run {
        println!("{}", "Dry run: no stores or checkpoints were changed".yellow());
    }
    if let Some(last) = report.resumed_after {
        println!("Resumed after facility index {}", last.to_string().cyan());
    }
    println!("Inspection trees found: {}", report.datasets.to_string().cyan());
    println!();

    for facility in &report.facilities {
        let status = match &facility.outcome {
            FacilityOutcome::Migrated {
                dataset,
                locations,
                equipment,
                inspection_items,
            } => format!(
                "{} ({} locations, {} equipment, {} items from {})",
                "migrated".green(),
                locations,
                equipment,
                inspection_items,
                dataset.dimmed()
            ),
            FacilityOutcome::NoDataset => "no matching inspection tree".yellow().to_string(),
            FacilityOutcome::Legacy => "legacy path".blue().to_string(),
            FacilityOutcome::Incomplete => "skipped, incomplete registry row".dimmed().to_string(),
        };
        println!(
            "  [{}] {} {}: {}",
            facility.index,
            facility.facility_id.bold(),
            facility.name,
            status
        );
    }

    println!();
    println!(
        "{} {} facilities migrated, {} records",
        "Done:".bright_green().bold(),
        report.migrated_count(),
        report.total_records()
    );
    let unmatched = report.count_outcome(&FacilityOutcome::NoDataset);
    if unmatched > 0 {
        println!("{} facilities had no inspection tree", unmatched.to_string().yellow());
    }
}
