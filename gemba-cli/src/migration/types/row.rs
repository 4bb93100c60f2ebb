//! Raw CSV rows and their hierarchy level

/// A single parsed CSV row, fields in file order
pub type RawRow = Vec<String>;

/// Hierarchy level encoded in the row-type column (field 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowLevel {
    /// `01...` rows
    Building,
    /// `02...` rows
    Room,
    /// `03...` rows
    Equipment,
    /// `04...` rows
    Item,
}

impl RowLevel {
    /// Two-character code that opens the row-type field
    pub fn code(&self) -> &'static str {
        match self {
            RowLevel::Building => "01",
            RowLevel::Room => "02",
            RowLevel::Equipment => "03",
            RowLevel::Item => "04",
        }
    }

    pub fn all_variants() -> &'static [RowLevel] {
        &[
            RowLevel::Building,
            RowLevel::Room,
            RowLevel::Equipment,
            RowLevel::Item,
        ]
    }
}

/// Get a trimmed field, empty when the row is too short
pub fn field_at(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}
