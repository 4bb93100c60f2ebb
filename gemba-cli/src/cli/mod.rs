//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use commands::analyze::{AnalyzeCommands, handle_analyze_command};
use commands::migrate::{MigrateArgs, handle_migrate_command};
use commands::progress::{handle_reset_command, handle_status_command};

#[derive(Parser, Debug)]
#[command(name = "gemba-cli")]
#[command(version, about = "Migrate SmartGEMBA inspection exports into facility workbooks")]
pub struct Cli {
    /// Config file (default: <config dir>/gemba-cli/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run or resume the facility migration
    Migrate(MigrateArgs),
    /// Show the stored checkpoint and migration status
    Status,
    /// Forget stored progress so the next run starts over
    Reset,
    /// Survey CSV exports
    #[command(subcommand)]
    Analyze(AnalyzeCommands),
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Migrate(args) => handle_migrate_command(args, &config).await,
        Commands::Status => handle_status_command(&config).await,
        Commands::Reset => handle_reset_command(&config).await,
        Commands::Analyze(command) => handle_analyze_command(command, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate_with_global_config() {
        let cli = Cli::try_parse_from(["gemba-cli", "migrate", "--dry-run", "--config", "gemba.toml"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("gemba.toml")));
        match cli.command {
            Commands::Migrate(args) => assert!(args.dry_run),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_inspection_types_default_column() {
        let cli = Cli::try_parse_from(["gemba-cli", "analyze", "inspection-types", "点検情報.csv"])
            .unwrap();

        match cli.command {
            Commands::Analyze(AnalyzeCommands::InspectionTypes { column, .. }) => {
                assert_eq!(column, 11)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
