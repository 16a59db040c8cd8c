//! CLI command implementations.

pub mod locations;
pub mod login;
pub mod products;
pub mod sync;

use anyhow::{Context, Result};
use runsync_store::{SyncConfig, SyncReport, SyncRun};
use tracing::debug;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Reads the configuration, with command-line overrides applied.
pub fn load_config(cli: &Cli) -> Result<SyncConfig> {
    SyncConfig::load_env_file(cli.env_file.as_deref())?;
    let mut config = SyncConfig::from_env().context("invalid configuration")?;

    if let Some(dir) = &cli.output_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(base) = &cli.api_base {
        config.api_base.clone_from(base);
    }

    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

/// Builds a run from the configuration.
pub fn build_run(cli: &Cli) -> Result<SyncRun> {
    let config = load_config(cli)?;
    Ok(SyncRun::from_config(&config)?)
}

/// Prints a report in the selected format.
pub fn print_report(report: &SyncReport, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            print!("{}", formatter.format_report(report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(report)?);
        }
    }
    Ok(())
}
