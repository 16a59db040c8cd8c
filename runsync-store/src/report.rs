//! Per-run summary.

use runsync_core::{LocationId, LocationSet};
use serde::Serialize;
use std::path::PathBuf;

/// Where a location list's ids came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSource {
    /// Fetched and persisted this run.
    Fetched,
    /// Fetch failed; ids read from the previously persisted file.
    Fallback,
    /// Fetch failed and no persisted file was usable.
    Unavailable,
}

/// Outcome for one location list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOutcome {
    /// `ordering-disabled` or `ordering-enabled`.
    pub set: String,
    /// Source of the ids.
    pub source: ListSource,
    /// Number of locations in the list.
    pub locations: usize,
}

impl ListOutcome {
    /// Creates an outcome.
    pub fn new(set: LocationSet, source: ListSource, locations: usize) -> Self {
        Self {
            set: set.to_string(),
            source,
            locations,
        }
    }
}

/// A catalog that was written or deliberately skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Location id.
    pub location_id: LocationId,
    /// Catalog file.
    pub file: PathBuf,
    /// `cached_at` of the offered catalog.
    pub cached_at: String,
}

/// An item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// What failed (`location 42`, `ordering-enabled list`).
    pub item: String,
    /// Why.
    pub reason: String,
}

impl ItemFailure {
    /// Creates a failure record.
    pub fn new(item: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            item: item.into(),
            reason: reason.to_string(),
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Location lists fetched this run.
    pub location_lists: Vec<ListOutcome>,
    /// Deduplicated location ids handed to the product fetch.
    pub location_ids: Vec<LocationId>,
    /// Catalogs written.
    pub written: Vec<CatalogEntry>,
    /// Catalogs skipped because the stored copy is as new or newer.
    pub stale: Vec<CatalogEntry>,
    /// Items that failed and were skipped.
    pub failures: Vec<ItemFailure>,
    /// Number of times the token was replaced.
    pub token_refreshes: u32,
}

impl SyncReport {
    /// Returns true if nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
