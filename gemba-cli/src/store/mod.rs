//! Spreadsheet-backed storage for facility records and the facility registry

pub mod workbook;

pub use workbook::{WorkbookRegistry, WorkbookStoreOpener};
