// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # runsync Store
//!
//! The output directory and the sync run for `runsync`.
//!
//! This crate provides:
//!
//! - **SyncConfig**: Run configuration read from the environment (and `.env`)
//! - **SnapshotStore**: Location lists and catalogs on disk, with the
//!   newer-only rule for catalogs
//! - **LocationFetcher** / **ProductFetcher**: The two fetch phases
//! - **SyncRun**: Wires everything together and produces a **SyncReport**
//!
//! ## Usage
//!
//! ```ignore
//! use runsync_store::{SyncConfig, SyncRun};
//!
//! SyncConfig::load_env_file(None)?;
//! let config = SyncConfig::from_env()?;
//!
//! let report = SyncRun::from_config(&config)?.run().await?;
//! println!("{} catalogs written", report.written.len());
//! ```

pub mod config;
pub mod error;
pub mod locations;
pub mod persistence;
pub mod products;
pub mod report;
pub mod run;
pub mod snapshots;

pub use config::{SecretStoreConfig, SyncConfig};
pub use error::StoreError;
pub use locations::LocationFetcher;
pub use persistence::{ensure_dir, load_json, save_json};
pub use products::ProductFetcher;
pub use report::{CatalogEntry, ItemFailure, ListOutcome, ListSource, SyncReport};
pub use run::SyncRun;
pub use snapshots::{CatalogWrite, SnapshotStore};

#[cfg(test)]
mod sync_tests;
