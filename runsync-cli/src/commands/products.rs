//! Products command - refresh the catalogs of explicit locations.

use anyhow::Result;
use clap::Args;
use runsync_core::LocationId;
use tracing::info;

use super::{build_run, print_report};
use crate::Cli;

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Location ids to fetch.
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<String>,
}

impl ProductsArgs {
    /// The ids as sent to the backend: numeric where possible.
    pub fn location_ids(&self) -> Vec<LocationId> {
        let mut ids: Vec<LocationId> = self.ids.iter().map(|s| LocationId::parse(s)).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Runs the products command.
pub async fn run(args: &ProductsArgs, cli: &Cli) -> Result<()> {
    let ids = args.location_ids();
    info!(count = ids.len(), "Fetching selected catalogs");

    let report = build_run(cli)?.products(&ids).await?;
    print_report(&report, cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ids_are_parsed_and_deduplicated() {
        let args = ProductsArgs {
            ids: vec!["42".to_string(), "7".to_string(), "42".to_string(), "abc".to_string()],
        };

        assert_eq!(
            args.location_ids(),
            vec![
                LocationId::from(7),
                LocationId::from(42),
                LocationId::from("abc"),
            ]
        );
    }
}
