//! Locations command - refresh the two location lists only.

use anyhow::Result;

use super::{build_run, print_report};
use crate::Cli;

/// Runs the locations command.
pub async fn run(cli: &Cli) -> Result<()> {
    let report = build_run(cli)?.locations().await?;
    print_report(&report, cli)
}
