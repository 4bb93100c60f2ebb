mod handler;

use std::path::PathBuf;

use clap::Subcommand;

use crate::analyze::DEFAULT_INSPECTION_TYPE_COLUMN;

pub use handler::handle_analyze_command;

#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Unique values of the configured target columns
    Columns {
        /// CSV export to survey
        csv: PathBuf,
        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Unique inspection types over inspection rows
    InspectionTypes {
        csv: PathBuf,
        /// Zero-based column holding the inspection type
        #[arg(short, long, default_value_t = DEFAULT_INSPECTION_TYPE_COLUMN)]
        column: usize,
    },
    /// Header row and the first data rows
    Headers {
        csv: PathBuf,
        #[arg(short, long, default_value_t = 1)]
        rows: usize,
    },
}
