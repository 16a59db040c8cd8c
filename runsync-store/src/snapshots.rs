//! The output directory.
//!
//! Holds the two location lists and one catalog document per location. A
//! catalog is only replaced when the incoming `cached_at` is strictly newer
//! than the one on disk.

use runsync_core::{CachedAt, CatalogHeader, LocationSet};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

// ============================================================================
// Catalog Write Outcome
// ============================================================================

/// Result of offering a catalog to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWrite {
    /// The document was written.
    Written {
        /// File written.
        path: PathBuf,
        /// The `cached_at` that was replaced, if a usable one existed.
        replaced: Option<CachedAt>,
    },
    /// The file on disk is as new or newer; nothing was written.
    Stale {
        /// File left untouched.
        path: PathBuf,
        /// `cached_at` on disk.
        existing: CachedAt,
        /// `cached_at` offered.
        incoming: CachedAt,
    },
    /// The document has no `cached_at`, so it cannot be ordered; nothing was written.
    MissingTimestamp {
        /// File left untouched.
        path: PathBuf,
    },
}

// ============================================================================
// Snapshot Store
// ============================================================================

/// JSON documents under one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file in the output directory.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Writes a location-list response verbatim.
    pub async fn save_location_list(
        &self,
        set: LocationSet,
        body: &Value,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path_for(set.file_name());
        save_json(&path, body).await?;
        Ok(path)
    }

    /// Reads the previously persisted response for a location list.
    ///
    /// Returns `None` if there is no usable file.
    pub async fn load_location_list(&self, set: LocationSet) -> Option<Value> {
        let path = self.path_for(set.file_name());
        if !path.exists() {
            return None;
        }

        match load_json(&path).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Persisted location list is unreadable");
                None
            }
        }
    }

    /// The `cached_at` of the catalog stored in `path`, if it has a usable one.
    pub async fn existing_cached_at(&self, path: &Path) -> Option<CachedAt> {
        if !path.exists() {
            return None;
        }

        match load_json::<Value>(path).await {
            Ok(existing) => {
                let cached_at = CatalogHeader::from_value(&existing).cached_at;
                if cached_at.is_none() {
                    warn!(path = %path.display(), "Existing catalog has no cached_at, it will be replaced");
                }
                cached_at
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Existing catalog is unreadable, it will be replaced");
                None
            }
        }
    }

    /// Writes `document` to `file_name` unless the stored copy is as new or newer.
    pub async fn write_catalog_if_newer(
        &self,
        file_name: &str,
        incoming: Option<&CachedAt>,
        document: &Value,
    ) -> Result<CatalogWrite, StoreError> {
        let path = self.path_for(file_name);

        let Some(incoming) = incoming else {
            return Ok(CatalogWrite::MissingTimestamp { path });
        };

        let existing = self.existing_cached_at(&path).await;
        if let Some(existing) = existing.as_ref() {
            if !incoming.is_newer_than(existing) {
                debug!(
                    path = %path.display(),
                    existing = %existing,
                    incoming = %incoming,
                    "Stored catalog is not older"
                );
                return Ok(CatalogWrite::Stale {
                    path,
                    existing: existing.clone(),
                    incoming: incoming.clone(),
                });
            }
        }

        save_json(&path, document).await?;
        Ok(CatalogWrite::Written {
            path,
            replaced: existing,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
