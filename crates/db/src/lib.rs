pub mod catalog;
pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use catalog::{CatalogLookup, LookupOutcome, SqlCatalogLookup};
pub use connection::{connect_with_settings, DbPool};
pub use fixtures::{DemoCatalog, SeedSummary, SeedVerification};

