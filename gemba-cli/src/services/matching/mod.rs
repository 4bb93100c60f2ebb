// Facility matching service
//
// Decides which inspection-tree export belongs to which facility. Export
// files are named after the facility in parentheses, while the facility
// registry uses the full display name, so matching is a loose substring test.

pub mod core;
pub mod models;

pub use self::core::{extract_facility_name, find_dataset};
