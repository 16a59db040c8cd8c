//! Sync command - location lists, then every catalog.

use anyhow::Result;
use tracing::info;

use super::{build_run, print_report};
use crate::Cli;

/// Runs the sync command.
pub async fn run(cli: &Cli) -> Result<()> {
    let mut run = build_run(cli)?;
    info!(dir = %run.snapshots().dir().display(), "Starting sync");

    let report = run.run().await?;
    print_report(&report, cli)
}
