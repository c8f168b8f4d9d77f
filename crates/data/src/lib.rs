//! CSV dataset loading layer
//!
//! Reads the five subscription-system exports (users, subscriptions,
//! plans, billing, logs) into the core domain types. Loading is strict
//! about file presence and CSV shape, and deliberately lenient about the
//! three subscription date columns, which parse to absent on failure.

pub mod error;
pub mod fixtures;
pub mod loader;
mod records;

pub use error::DataError;
pub use fixtures::{write_demo_dataset, SeedSummary};
pub use loader::{Dataset, DatasetPaths, LogRecord};
