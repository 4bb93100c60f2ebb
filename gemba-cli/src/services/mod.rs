// Business logic services layer
//
// Reusable logic that sits between the dataset source and the migration
// driver, kept free of I/O so it can be exercised from tests and the CLI alike.

pub mod matching;
