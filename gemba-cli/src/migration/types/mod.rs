//! Core types for hierarchy migration

mod dataset;
mod layout;
mod records;
mod row;

pub use dataset::*;
pub use layout::*;
pub use records::*;
pub use row::*;
