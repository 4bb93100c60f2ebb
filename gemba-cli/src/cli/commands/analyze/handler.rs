//! Analyze command handler

use std::fs;

use anyhow::{Context, Result};
use colored::*;

use super::AnalyzeCommands;
use crate::analyze::{
    HeaderPreview, inspection_types, render_column_report, render_header_preview,
    render_inspection_types, survey_columns,
};
use crate::config::Config;
use crate::source::read_csv_file;

pub fn handle_analyze_command(command: AnalyzeCommands, config: &Config) -> Result<()> {
    match command {
        AnalyzeCommands::Columns { csv, output } => {
            let rows = read_csv_file(&csv)?;
            let surveys = survey_columns(&rows, &config.analyze.target_columns);
            let report = render_column_report(&rows, &surveys);

            print!("{}", report);
            if let Some(path) = output {
                fs::write(&path, &report)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                println!("Report written to {}", path.display().to_string().cyan());
            }
        }
        AnalyzeCommands::InspectionTypes { csv, column } => {
            let rows = read_csv_file(&csv)?;
            let values = inspection_types(&rows, column);
            print!("{}", render_inspection_types(rows.len(), column, &values));
        }
        AnalyzeCommands::Headers { csv, rows: limit } => {
            let rows = read_csv_file(&csv)?;
            print!("{}", render_header_preview(&HeaderPreview::new(&rows, limit)));
        }
    }
    Ok(())
}
