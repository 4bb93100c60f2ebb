pub mod analyze;
pub mod migrate;
pub mod progress;
