//! Builds linked location/equipment/item records from an inspection tree.
//!
//! The export is a flat list where each row's type says how deep it sits:
//! buildings contain rooms, rooms (or buildings directly) contain equipment,
//! equipment contains inspection items. Walking the rows in order while
//! remembering the most recent ancestor at each level is enough to recover
//! the tree.

use super::classify::classify_row;
use super::types::{
    ColumnLayout, Equipment, FacilityHierarchy, InspectionItem, Location, RawRow, RowLevel,
    field_at,
};

/// Derive the ID namespace for a facility (`F-001` -> `F001`).
/// Only the first `-` is dropped.
pub fn facility_code(facility_id: &str) -> String {
    facility_id.replacen('-', "", 1)
}

/// Monotonic ID generator for one record kind
#[derive(Debug, Clone)]
struct IdSequence {
    prefix: &'static str,
    next: u32,
}

impl IdSequence {
    fn new(prefix: &'static str) -> Self {
        IdSequence { prefix, next: 1 }
    }

    fn mint(&mut self, code: &str) -> String {
        let id = format!("{}_{}-{:05}", code, self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Ancestry and counters threaded through the row fold
#[derive(Debug, Clone)]
struct HierarchyState {
    current_building: Option<String>,
    current_room: Option<String>,
    current_equipment: Option<String>,
    locations: IdSequence,
    equipment: IdSequence,
    items: IdSequence,
}

impl HierarchyState {
    fn new() -> Self {
        HierarchyState {
            current_building: None,
            current_room: None,
            current_equipment: None,
            locations: IdSequence::new("L"),
            equipment: IdSequence::new("E"),
            items: IdSequence::new("II"),
        }
    }
}

/// Builder for one facility's hierarchy
pub struct HierarchyBuilder<'a> {
    facility_id: &'a str,
    facility_code: &'a str,
    layout: ColumnLayout,
    state: HierarchyState,
    output: FacilityHierarchy,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(facility_id: &'a str, facility_code: &'a str, layout: ColumnLayout) -> Self {
        HierarchyBuilder {
            facility_id,
            facility_code,
            layout,
            state: HierarchyState::new(),
            output: FacilityHierarchy::default(),
        }
    }

    /// Consume one row. Unclassified rows leave the builder unchanged.
    pub fn push(mut self, row: &[String]) -> Self {
        let Some(level) = classify_row(row) else {
            return self;
        };
        let name = field_at(row, self.layout.name_column(level)).to_string();
        let state = &mut self.state;

        match level {
            RowLevel::Building => {
                let id = state.locations.mint(self.facility_code);
                self.output
                    .locations
                    .push(Location::building(id.clone(), self.facility_id, name));
                state.current_building = Some(id);
                state.current_room = None;
            }
            RowLevel::Room => {
                let id = state.locations.mint(self.facility_code);
                self.output.locations.push(Location::room(
                    id.clone(),
                    self.facility_id,
                    state.current_building.clone(),
                    name,
                ));
                state.current_room = Some(id);
            }
            RowLevel::Equipment => {
                let id = state.equipment.mint(self.facility_code);
                let location_id = state
                    .current_room
                    .clone()
                    .or_else(|| state.current_building.clone());
                self.output.equipment.push(Equipment {
                    equipment_id: id.clone(),
                    facility_id: self.facility_id.to_string(),
                    location_id,
                    name,
                });
                state.current_equipment = Some(id);
            }
            RowLevel::Item => {
                let id = state.items.mint(self.facility_code);
                self.output.inspection_items.push(InspectionItem {
                    item_id: id,
                    equipment_id: state.current_equipment.clone(),
                    item_name: name,
                });
            }
        }

        self
    }

    pub fn finish(self) -> FacilityHierarchy {
        self.output
    }
}

/// Build the full record set for a facility from its rows, in file order
pub fn build_hierarchy(
    rows: &[RawRow],
    facility_id: &str,
    facility_code: &str,
    layout: ColumnLayout,
) -> FacilityHierarchy {
    rows.iter()
        .fold(
            HierarchyBuilder::new(facility_id, facility_code, layout),
            |builder, row| builder.push(row),
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    /// Rows in the default export layout (name in column 2..=5)
    fn building(name: &str) -> RawRow {
        row(&["01建物", "", name])
    }
    fn room(name: &str) -> RawRow {
        row(&["02部屋", "", "", name])
    }
    fn equipment(name: &str) -> RawRow {
        row(&["03点検対象", "", "", "", name])
    }
    fn item(name: &str) -> RawRow {
        row(&["04点検項目", "", "", "", "", name])
    }

    fn build(rows: &[RawRow]) -> FacilityHierarchy {
        build_hierarchy(rows, "F-001", &facility_code("F-001"), ColumnLayout::default())
    }

    #[test]
    fn test_facility_code() {
        assert_eq!(facility_code("F-001"), "F001");
        assert_eq!(facility_code("F001"), "F001");
        assert_eq!(facility_code("F-001-A"), "F001-A");
    }

    #[test]
    fn test_single_chain_with_shifted_layout() {
        let rows = vec![
            row(&["01", "", "", "BldgA"]),
            row(&["02", "", "", "", "RoomA"]),
            row(&["03", "", "", "", "", "EqA"]),
            row(&["04", "", "", "", "", "", "ItemA"]),
        ];
        let result = build_hierarchy(&rows, "F-001", "F001", ColumnLayout::default().shifted(1));

        assert_eq!(result.locations.len(), 2);
        let bldg = &result.locations[0];
        assert_eq!(bldg.location_id, "F001_L-00001");
        assert_eq!(bldg.building.as_deref(), Some("BldgA"));
        assert_eq!(bldg.room, None);

        let rm = &result.locations[1];
        assert_eq!(rm.location_id, "F001_L-00002");
        assert_eq!(rm.room.as_deref(), Some("RoomA"));
        assert_eq!(rm.parent_location_id.as_deref(), Some("F001_L-00001"));

        assert_eq!(result.equipment.len(), 1);
        assert_eq!(result.equipment[0].equipment_id, "F001_E-00001");
        assert_eq!(result.equipment[0].name, "EqA");
        assert_eq!(result.equipment[0].location_id.as_deref(), Some("F001_L-00002"));

        assert_eq!(result.inspection_items.len(), 1);
        assert_eq!(result.inspection_items[0].item_id, "F001_II-00001");
        assert_eq!(result.inspection_items[0].item_name, "ItemA");
        assert_eq!(
            result.inspection_items[0].equipment_id.as_deref(),
            Some("F001_E-00001")
        );
    }

    #[test]
    fn test_location_count_and_order() {
        let rows = vec![
            building("B1"),
            room("R1"),
            equipment("E1"),
            item("I1"),
            room("R2"),
            building("B2"),
            room("R3"),
        ];
        let result = build(&rows);

        let names: Vec<_> = result
            .locations
            .iter()
            .map(|l| l.building.clone().or(l.room.clone()).unwrap())
            .collect();
        assert_eq!(names, vec!["B1", "R1", "R2", "B2", "R3"]);
        assert_eq!(result.building_count(), 2);
        assert_eq!(result.room_count(), 3);
    }

    #[test]
    fn test_room_parent_is_nearest_building() {
        let rows = vec![room("orphan"), building("B1"), room("R1"), building("B2"), room("R2")];
        let result = build(&rows);

        assert_eq!(result.locations[0].parent_location_id, None);
        assert_eq!(result.locations[2].parent_location_id.as_deref(), Some("F001_L-00002"));
        assert_eq!(result.locations[4].parent_location_id.as_deref(), Some("F001_L-00004"));
    }

    #[test]
    fn test_equipment_falls_back_to_building_after_new_building() {
        let rows = vec![
            building("B1"),
            room("R1"),
            equipment("in room"),
            building("B2"),
            equipment("in building"),
        ];
        let result = build(&rows);

        assert_eq!(result.equipment[0].location_id.as_deref(), Some("F001_L-00002"));
        assert_eq!(result.equipment[1].location_id.as_deref(), Some("F001_L-00003"));
    }

    #[test]
    fn test_equipment_before_any_location() {
        let result = build(&[equipment("loose")]);
        assert_eq!(result.equipment[0].location_id, None);
    }

    #[test]
    fn test_item_before_equipment_has_no_parent() {
        let rows = vec![building("B1"), item("early"), equipment("E1"), item("late")];
        let result = build(&rows);

        assert_eq!(result.inspection_items.len(), 2);
        assert_eq!(result.inspection_items[0].equipment_id, None);
        assert_eq!(
            result.inspection_items[1].equipment_id.as_deref(),
            Some("F001_E-00001")
        );
    }

    #[test]
    fn test_ids_are_sequential_per_kind() {
        let rows = vec![
            building("B1"),
            equipment("E1"),
            item("I1"),
            item("I2"),
            room("R1"),
            equipment("E2"),
            item("I3"),
        ];
        let result = build(&rows);

        let location_ids: Vec<_> = result.locations.iter().map(|l| l.location_id.as_str()).collect();
        assert_eq!(location_ids, vec!["F001_L-00001", "F001_L-00002"]);
        let equipment_ids: Vec<_> = result.equipment.iter().map(|e| e.equipment_id.as_str()).collect();
        assert_eq!(equipment_ids, vec!["F001_E-00001", "F001_E-00002"]);
        let item_ids: Vec<_> = result.inspection_items.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(item_ids, vec!["F001_II-00001", "F001_II-00002", "F001_II-00003"]);
    }

    #[test]
    fn test_unclassified_rows_are_skipped() {
        let rows = vec![
            row(&["種別", "", "建物名"]),
            building("B1"),
            row(&[]),
            row(&["99", "", "noise"]),
            room("R1"),
        ];
        let result = build(&rows);
        assert_eq!(result.locations.len(), 2);
        assert_eq!(result.locations[1].location_id, "F001_L-00002");
    }

    #[test]
    fn test_short_rows_and_whitespace_names() {
        let rows = vec![row(&["01"]), row(&["02", "", "", "  Room 1  "])];
        let result = build(&rows);
        assert_eq!(result.locations[0].building.as_deref(), Some(""));
        assert_eq!(result.locations[1].room.as_deref(), Some("Room 1"));
    }

    #[test]
    fn test_separate_runs_restart_counters() {
        let rows = vec![building("B1")];
        let first = build(&rows);
        let second = build_hierarchy(&rows, "F-002", "F002", ColumnLayout::default());
        assert_eq!(first.locations[0].location_id, "F001_L-00001");
        assert_eq!(second.locations[0].location_id, "F002_L-00001");
        assert_eq!(second.locations[0].facility_id, "F-002");
    }
}
