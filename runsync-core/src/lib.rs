// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # runsync Core
//!
//! Core types and models shared by the `runsync` crates.
//!
//! This crate has no I/O. It provides:
//!
//! - The bearer [`Credential`] and the [`CredentialStore`] it lives in
//! - Location models ([`Location`], [`LocationId`], [`LocationSet`])
//! - Catalog models ([`CatalogHeader`], [`CachedAt`]) and filename derivation
//!
//! ## Key Types
//!
//! ### Credentials
//! - [`Credential`] - Opaque bearer token, redacted in `Debug` output
//! - [`CredentialStore`] - get/set seam for the current token
//! - [`MemoryCredentialStore`] - In-process store that counts replacements
//!
//! ### Locations
//! - [`LocationId`] - Backend location id (numeric or textual)
//! - [`LocationSet`] - Which of the two location lists a request targets
//! - [`LocationList`] - Lenient view over a list-locations response
//!
//! ### Catalogs
//! - [`CachedAt`] - Freshness timestamp with instant-aware comparison
//! - [`CatalogHeader`] - The `location` / `cached_at` part of a catalog response

pub mod credential;
pub mod models;

pub use credential::{Credential, CredentialStore, MemoryCredentialStore};
pub use models::{
    // Locations
    Location,
    LocationId,
    LocationList,
    LocationSet,
    // Catalogs
    CachedAt,
    CatalogHeader,
    catalog_file_name,
    sanitize_file_stem,
};
