//! Product Fetcher.
//!
//! For each location id, fetches the product catalog and stores it under the
//! location's sanitized name if it is newer than what is already on disk. A
//! failing location is logged and skipped; only a failed re-authentication
//! stops the batch.

use runsync_core::{CatalogHeader, CredentialStore, LocationId, catalog_file_name};
use runsync_fetch::Backend;
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::report::{CatalogEntry, ItemFailure, SyncReport};
use crate::snapshots::{CatalogWrite, SnapshotStore};

/// Fetches and conditionally persists product catalogs.
#[derive(Debug)]
pub struct ProductFetcher<'a> {
    backend: &'a Backend,
    snapshots: &'a SnapshotStore,
}

impl<'a> ProductFetcher<'a> {
    /// Creates a fetcher.
    pub fn new(backend: &'a Backend, snapshots: &'a SnapshotStore) -> Self {
        Self { backend, snapshots }
    }

    /// Processes every id in order.
    ///
    /// # Errors
    ///
    /// Only a failed re-authentication aborts; everything else is recorded
    /// in `report` and skipped.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn fetch_all(
        &self,
        credentials: &mut dyn CredentialStore,
        ids: &[LocationId],
        report: &mut SyncReport,
    ) -> Result<(), StoreError> {
        for id in ids {
            self.fetch_one(credentials, id, report).await?;
        }

        info!(
            written = report.written.len(),
            stale = report.stale.len(),
            failed = report.failures.len(),
            "Product fetch finished"
        );
        Ok(())
    }

    /// Fetches and stores one catalog.
    pub async fn fetch_one(
        &self,
        credentials: &mut dyn CredentialStore,
        id: &LocationId,
        report: &mut SyncReport,
    ) -> Result<(), StoreError> {
        let item = format!("location {id}");

        let body = match self.backend.list_products(credentials, id).await {
            Ok(body) => body,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(location_id = %id, error = %e, "Skipping location");
                report.failures.push(ItemFailure::new(item, &e));
                return Ok(());
            }
        };

        let header = CatalogHeader::from_value(&body);
        if !header.has_location {
            warn!(location_id = %id, "No 'location' key found in response");
            report
                .failures
                .push(ItemFailure::new(item, "response has no location"));
            return Ok(());
        }

        let file_name = catalog_file_name(header.location_name.as_deref(), id);
        let outcome = self
            .snapshots
            .write_catalog_if_newer(&file_name, header.cached_at.as_ref(), &body)
            .await;

        match outcome {
            Ok(CatalogWrite::Written { path, replaced }) => {
                info!(
                    location_id = %id,
                    file = %path.display(),
                    previous = ?replaced.as_ref().map(|c| c.as_str()),
                    "Catalog written"
                );
                report.written.push(CatalogEntry {
                    location_id: id.clone(),
                    file: path,
                    cached_at: header.cached_at.map(|c| c.to_string()).unwrap_or_default(),
                });
            }
            Ok(CatalogWrite::Stale {
                path,
                existing,
                incoming,
            }) => {
                info!(
                    location_id = %id,
                    file = %path.display(),
                    existing = %existing,
                    incoming = %incoming,
                    "Skipping file update: new data is not newer"
                );
                report.stale.push(CatalogEntry {
                    location_id: id.clone(),
                    file: path,
                    cached_at: incoming.to_string(),
                });
            }
            Ok(CatalogWrite::MissingTimestamp { path }) => {
                warn!(location_id = %id, file = %path.display(), "Response has no cached_at, not written");
                report
                    .failures
                    .push(ItemFailure::new(item, "response has no cached_at"));
            }
            Err(e) => {
                error!(location_id = %id, file = %file_name, error = %e, "Failed to write catalog");
                report.failures.push(ItemFailure::new(item, &e));
            }
        }

        Ok(())
    }
}
