//! Source datasets loaded from the CSV export folder

use super::RawRow;

/// One inspection-tree export, tagged with the facility it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File name the rows came from
    pub source_name: String,
    /// Facility name extracted from the file name
    pub facility_tag: String,
    pub rows: Vec<RawRow>,
}

impl Dataset {
    pub fn new(
        source_name: impl Into<String>,
        facility_tag: impl Into<String>,
        rows: Vec<RawRow>,
    ) -> Self {
        Dataset {
            source_name: source_name.into(),
            facility_tag: facility_tag.into(),
            rows,
        }
    }
}

/// Tables from the older export shape, only consumed by the legacy path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyTables {
    /// `施設情報` export
    pub facilities: Option<Vec<RawRow>>,
    /// `設備情報` export
    pub equipment: Option<Vec<RawRow>>,
}

/// Everything the dataset source produced for one migration run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCatalog {
    /// Inspection-tree datasets in discovery order
    pub hierarchy: Vec<Dataset>,
    pub legacy: LegacyTables,
}

impl DatasetCatalog {
    pub fn dataset_count(&self) -> usize {
        self.hierarchy.len()
    }
}
