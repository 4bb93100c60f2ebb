//! Dataset sources for migration input

pub mod csv;

pub use self::csv::{FolderDatasetSource, read_csv_file};
