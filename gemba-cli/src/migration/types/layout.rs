//! Column offsets of the descriptive name per hierarchy level

use serde::{Deserialize, Serialize};

use super::RowLevel;

/// Which column holds the name for each row level.
///
/// The SmartGEMBA inspection-tree export indents names by level, so the
/// building name sits in column 2, the room name in column 3 and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub building: usize,
    pub room: usize,
    pub equipment: usize,
    pub item: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout {
            building: 2,
            room: 3,
            equipment: 4,
            item: 5,
        }
    }
}

impl ColumnLayout {
    /// Name column for a row level
    pub fn name_column(&self, level: RowLevel) -> usize {
        match level {
            RowLevel::Building => self.building,
            RowLevel::Room => self.room,
            RowLevel::Equipment => self.equipment,
            RowLevel::Item => self.item,
        }
    }

    /// Same layout shifted `by` columns to the right
    #[cfg(test)]
    pub fn shifted(&self, by: usize) -> Self {
        ColumnLayout {
            building: self.building + by,
            room: self.room + by,
            equipment: self.equipment + by,
            item: self.item + by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_columns() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.name_column(RowLevel::Building), 2);
        assert_eq!(layout.name_column(RowLevel::Item), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let layout: ColumnLayout = toml::from_str("room = 7").unwrap();
        assert_eq!(layout.room, 7);
        assert_eq!(layout.building, 2);
        assert_eq!(layout.shifted(1).item, 6);
    }
}
