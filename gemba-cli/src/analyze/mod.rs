//! Survey reports over raw CSV exports
//!
//! Used before a migration to see which values the exports actually carry
//! and how their columns are laid out.

mod columns;
mod preview;

pub use columns::{render_column_report, survey_columns};
pub use preview::{
    DEFAULT_INSPECTION_TYPE_COLUMN, HeaderPreview, inspection_types, render_header_preview,
    render_inspection_types,
};
