//! Domain errors raised by the migration layer

/// Error in migration input or state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// Stored checkpoint is not a facility index
    InvalidCheckpoint { value: String },
    /// A required header is absent from a sheet
    MissingColumn { sheet: String, column: String },
    /// A required sheet is absent from a workbook
    MissingSheet { workbook: String, sheet: String },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::InvalidCheckpoint { value } => {
                write!(
                    f,
                    "Stored checkpoint '{}' is not a facility index - run 'gemba-cli reset' to start over",
                    value
                )
            }
            MigrationError::MissingColumn { sheet, column } => {
                write!(f, "Sheet '{}' has no '{}' column", sheet, column)
            }
            MigrationError::MissingSheet { workbook, sheet } => {
                write!(f, "Workbook '{}' has no sheet named '{}'", workbook, sheet)
            }
        }
    }
}

impl std::error::Error for MigrationError {}
