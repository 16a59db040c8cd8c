//! Location Fetcher.
//!
//! Fetches the ordering-disabled and ordering-enabled location lists, writes
//! each successful response verbatim, and returns the deduplicated union of
//! their location ids.

use runsync_core::{CredentialStore, LocationId, LocationList, LocationSet};
use runsync_fetch::Backend;
use std::collections::BTreeSet;
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::report::{ItemFailure, ListOutcome, ListSource, SyncReport};
use crate::snapshots::SnapshotStore;

/// Fetches and persists the two location lists.
#[derive(Debug)]
pub struct LocationFetcher<'a> {
    backend: &'a Backend,
    snapshots: &'a SnapshotStore,
}

impl<'a> LocationFetcher<'a> {
    /// Creates a fetcher.
    pub fn new(backend: &'a Backend, snapshots: &'a SnapshotStore) -> Self {
        Self { backend, snapshots }
    }

    /// Fetches both lists and returns the union of their ids, sorted.
    ///
    /// A list whose fetch fails contributes the ids of its last persisted
    /// copy, if any.
    ///
    /// # Errors
    ///
    /// Only a failed re-authentication aborts; everything else is recorded
    /// in `report` and skipped.
    #[instrument(skip_all)]
    pub async fn fetch_all(
        &self,
        credentials: &mut dyn CredentialStore,
        report: &mut SyncReport,
    ) -> Result<Vec<LocationId>, StoreError> {
        let mut ids = BTreeSet::new();

        for set in LocationSet::ALL {
            let list = self.fetch_one(credentials, set, report).await?;
            ids.extend(list.ids().cloned());
        }

        let ids: Vec<LocationId> = ids.into_iter().collect();
        info!(count = ids.len(), "Collected unique location ids");
        report.location_ids.clone_from(&ids);
        Ok(ids)
    }

    async fn fetch_one(
        &self,
        credentials: &mut dyn CredentialStore,
        set: LocationSet,
        report: &mut SyncReport,
    ) -> Result<LocationList, StoreError> {
        let body = match self.backend.list_locations(credentials, set).await {
            Ok(body) => body,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(set = %set, error = %e, "Location list fetch failed");
                report
                    .failures
                    .push(ItemFailure::new(format!("{set} location list"), &e));
                return Ok(self.fallback(set, report).await);
            }
        };

        if !body.is_object() {
            warn!(set = %set, "Location list response is not a JSON object");
            report.failures.push(ItemFailure::new(
                format!("{set} location list"),
                "response body is not a JSON object",
            ));
            return Ok(self.fallback(set, report).await);
        }

        if let Err(e) = self.snapshots.save_location_list(set, &body).await {
            error!(set = %set, error = %e, "Failed to persist location list");
            report
                .failures
                .push(ItemFailure::new(format!("{set} location list file"), &e));
        }

        let list = LocationList::from_value(&body, set);
        if list.malformed > 0 {
            warn!(set = %set, malformed = list.malformed, "Skipped location entries without a usable id");
        }
        info!(set = %set, locations = list.locations.len(), "Fetched location list");
        report
            .location_lists
            .push(ListOutcome::new(set, ListSource::Fetched, list.locations.len()));
        Ok(list)
    }

    async fn fallback(&self, set: LocationSet, report: &mut SyncReport) -> LocationList {
        let Some(body) = self.snapshots.load_location_list(set).await else {
            warn!(set = %set, "No persisted location list to fall back to");
            report
                .location_lists
                .push(ListOutcome::new(set, ListSource::Unavailable, 0));
            return LocationList::default();
        };

        let list = LocationList::from_value(&body, set);
        info!(
            set = %set,
            locations = list.locations.len(),
            "Using previously persisted location list"
        );
        report
            .location_lists
            .push(ListOutcome::new(set, ListSource::Fallback, list.locations.len()));
        list
    }
}
