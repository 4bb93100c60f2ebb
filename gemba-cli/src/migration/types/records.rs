//! Normalized records produced from an inspection tree

use serde::{Deserialize, Serialize};

/// Number of columns written per inspection item (ID, equipment, name and
/// four reserved attribute columns)
pub const INSPECTION_ITEM_COLUMNS: usize = 7;

/// Building or room. Buildings fill `building`, rooms fill `room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    #[serde(rename = "Location_ID")]
    pub location_id: String,
    #[serde(rename = "Facility_ID")]
    pub facility_id: String,
    #[serde(rename = "Parent_Location_ID")]
    pub parent_location_id: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
}

impl Location {
    pub fn building(
        location_id: impl Into<String>,
        facility_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Location {
            location_id: location_id.into(),
            facility_id: facility_id.into(),
            parent_location_id: None,
            building: Some(name.into()),
            room: None,
        }
    }

    pub fn room(
        location_id: impl Into<String>,
        facility_id: impl Into<String>,
        parent_location_id: Option<String>,
        name: impl Into<String>,
    ) -> Self {
        Location {
            location_id: location_id.into(),
            facility_id: facility_id.into(),
            parent_location_id,
            building: None,
            room: Some(name.into()),
        }
    }

    pub fn is_building(&self) -> bool {
        self.building.is_some()
    }

    /// Value for a sheet column header. `Floor` is a known but always blank
    /// column.
    pub fn column(&self, header: &str) -> Option<&str> {
        match header {
            "Location_ID" => Some(&self.location_id),
            "Facility_ID" => Some(&self.facility_id),
            "Parent_Location_ID" => self.parent_location_id.as_deref(),
            "Building" => self.building.as_deref(),
            "Room" => self.room.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "Equipment_ID")]
    pub equipment_id: String,
    #[serde(rename = "Facility_ID")]
    pub facility_id: String,
    /// Enclosing room, or the building when no room is open
    #[serde(rename = "Location_ID")]
    pub location_id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
}

impl Equipment {
    pub fn column(&self, header: &str) -> Option<&str> {
        match header {
            "Equipment_ID" => Some(&self.equipment_id),
            "Facility_ID" => Some(&self.facility_id),
            "Location_ID" => self.location_id.as_deref(),
            "Name" => Some(&self.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionItem {
    #[serde(rename = "Item_ID")]
    pub item_id: String,
    /// Enclosing equipment; `None` for items that precede any equipment row
    #[serde(rename = "Equipment_ID")]
    pub equipment_id: Option<String>,
    #[serde(rename = "Item_Name")]
    pub item_name: String,
}

impl InspectionItem {
    /// Positional sheet row; trailing attribute columns stay blank
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.item_id.clone(),
            self.equipment_id.clone().unwrap_or_default(),
            self.item_name.clone(),
        ];
        row.resize(INSPECTION_ITEM_COLUMNS, String::new());
        row
    }
}

/// The three record sets generated for one facility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityHierarchy {
    pub locations: Vec<Location>,
    pub equipment: Vec<Equipment>,
    pub inspection_items: Vec<InspectionItem>,
}

impl FacilityHierarchy {
    pub fn building_count(&self) -> usize {
        self.locations.iter().filter(|l| l.is_building()).count()
    }

    pub fn room_count(&self) -> usize {
        self.locations.len() - self.building_count()
    }

    /// Borrow each record set as a store batch, in write order
    pub fn batches(&self) -> [RecordBatch<'_>; 3] {
        [
            RecordBatch::Locations(&self.locations),
            RecordBatch::Equipment(&self.equipment),
            RecordBatch::InspectionItems(&self.inspection_items),
        ]
    }
}

/// The record collections a facility store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Location,
    Equipment,
    InspectionItem,
}

impl RecordKind {
    /// Sheet that holds this kind in a facility workbook
    pub fn sheet_name(&self) -> &'static str {
        match self {
            RecordKind::Location => "M_Locations",
            RecordKind::Equipment => "M_Equipment",
            RecordKind::InspectionItem => "M_Inspection_Items",
        }
    }

    /// Header row used when a sheet has none yet
    pub fn default_headers(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Location => &[
                "Location_ID",
                "Facility_ID",
                "Parent_Location_ID",
                "Building",
                "Floor",
                "Room",
            ],
            RecordKind::Equipment => &["Equipment_ID", "Facility_ID", "Location_ID", "Name"],
            RecordKind::InspectionItem => &[
                "Item_ID",
                "Equipment_ID",
                "Item_Name",
                "Type",
                "Unit",
                "Lower_Limit",
                "Upper_Limit",
            ],
        }
    }

    pub fn all_variants() -> &'static [RecordKind] {
        &[
            RecordKind::Location,
            RecordKind::Equipment,
            RecordKind::InspectionItem,
        ]
    }
}

/// A borrowed set of records of one kind, handed to a record store
#[derive(Debug, Clone, Copy)]
pub enum RecordBatch<'a> {
    Locations(&'a [Location]),
    Equipment(&'a [Equipment]),
    InspectionItems(&'a [InspectionItem]),
}

impl RecordBatch<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordBatch::Locations(_) => RecordKind::Location,
            RecordBatch::Equipment(_) => RecordKind::Equipment,
            RecordBatch::InspectionItems(_) => RecordKind::InspectionItem,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordBatch::Locations(r) => r.len(),
            RecordBatch::Equipment(r) => r.len(),
            RecordBatch::InspectionItems(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the batch as sheet rows.
    ///
    /// Locations and equipment are laid out by matching each header to the
    /// record field of the same name, unknown headers become blank cells.
    /// Inspection items are always positional.
    pub fn to_rows(&self, headers: &[String]) -> Vec<Vec<String>> {
        fn by_header<'r>(headers: &[String], get: impl Fn(&str) -> Option<&'r str>) -> Vec<String> {
            headers
                .iter()
                .map(|h| get(h.as_str()).unwrap_or("").to_string())
                .collect()
        }

        match self {
            RecordBatch::Locations(records) => records
                .iter()
                .map(|r| by_header(headers, |h| r.column(h)))
                .collect(),
            RecordBatch::Equipment(records) => records
                .iter()
                .map(|r| by_header(headers, |h| r.column(h)))
                .collect(),
            RecordBatch::InspectionItems(records) => records.iter().map(|r| r.to_row()).collect(),
        }
    }
}
