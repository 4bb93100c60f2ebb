//! Status and reset command handlers

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::config::repository::{self, SqliteCheckpointStore, checkpoint::list_properties};
use crate::migration::{MigrationProgress, MigrationStatus, read_progress, reset_progress};

pub async fn handle_status_command(config: &Config) -> Result<()> {
    let pool = repository::connect(&config.state_db).await?;
    let store = SqliteCheckpointStore::new(pool);
    let progress = read_progress(&store).await?;

    println!("State database: {}", config.state_db.display().to_string().cyan());
    println!("Status: {}", status_label(&progress));
    match progress.last_processed {
        Some(index) => println!(
            "Last processed facility index: {} (next run starts at {})",
            index.to_string().bold(),
            progress.resume_index()
        ),
        None => println!("Last processed facility index: {}", "none".dimmed()),
    }

    let properties = list_properties(store.pool()).await?;
    if !properties.is_empty() {
        println!();
        for property in properties {
            println!(
                "  {} = {} {}",
                property.key,
                property.value,
                format!("(updated {})", property.updated_at).dimmed()
            );
        }
    }

    Ok(())
}

pub async fn handle_reset_command(config: &Config) -> Result<()> {
    let pool = repository::connect(&config.state_db).await?;
    let store = SqliteCheckpointStore::new(pool);
    reset_progress(&store).await?;

    log::info!("Migration progress reset");
    println!("{}", "Progress cleared; the next run starts from the beginning".green());
    Ok(())
}

fn status_label(progress: &MigrationProgress) -> String {
    match (progress.status(), progress.status.as_deref()) {
        (Some(MigrationStatus::Completed), _) => "completed".green().to_string(),
        (Some(MigrationStatus::MasterCompleted), _) => "in progress".yellow().to_string(),
        (None, Some(raw)) => format!("unknown ({})", raw).red().to_string(),
        (None, None) => "not started".dimmed().to_string(),
    }
}
