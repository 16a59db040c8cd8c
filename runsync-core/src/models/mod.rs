//! Domain models for runsync.
//!
//! ## Submodules
//!
//! - [`location`] - Location ids, the two location lists, and list parsing
//! - [`catalog`] - Catalog freshness timestamps and filename derivation

mod catalog;
mod location;

pub use catalog::{CachedAt, CatalogHeader, catalog_file_name, sanitize_file_stem};
pub use location::{Location, LocationId, LocationList, LocationSet};
#[cfg(test)]
mod serde_tests;
