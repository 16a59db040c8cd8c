// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! runsync CLI - keep local copies of the backend's location lists and
//! product catalogs up to date.
//!
//! # Examples
//!
//! ```bash
//! # Full sync into the current directory
//! runsync
//!
//! # Full sync into ./data, reading credentials from a custom env file
//! runsync --output-dir data --env-file ci.env
//!
//! # Only refresh the location lists
//! runsync locations
//!
//! # Only refresh two catalogs
//! runsync products 42 57
//!
//! # Force a login and publish the new token
//! runsync login
//!
//! # Machine-readable report
//! runsync --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{locations, login, products, sync};

// ============================================================================
// CLI Definition
// ============================================================================

/// runsync CLI - location and product catalog sync.
#[derive(Parser)]
#[command(name = "runsync")]
#[command(about = "Sync location lists and product catalogs to local JSON files")]
#[command(long_about = r"
runsync fetches the ordering-disabled and ordering-enabled location lists,
then the product catalog of every location found, and writes them as JSON
files. A catalog is only replaced when the backend's copy is newer.

Configuration comes from the environment (and an optional .env file):
  EMAIL, PASSWORD          account used to log in
  AUTH_TOKEN               token to start with (empty: log in first)
  REPO, GH_PAT             publish refreshed tokens as a repository secret
  AUTH_TOKEN_SECRET_NAME   secret name (default AUTH_TOKEN)

Examples:
  runsync                         # Full sync
  runsync locations               # Location lists only
  runsync products 42 57          # Two catalogs only
  runsync login                   # Force a login
  runsync --format json           # JSON report
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'sync' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory the JSON files are written to.
    #[arg(long, short = 'o', global = true)]
    pub output_dir: Option<PathBuf>,

    /// Backend API base URL.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Environment file to load before reading the configuration.
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, report only).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch location lists and catalogs (default if no command specified).
    #[command(visible_alias = "s")]
    Sync,

    /// Fetch and store the location lists only.
    #[command(visible_alias = "l")]
    Locations,

    /// Fetch and store the catalogs of the given locations only.
    #[command(visible_alias = "p")]
    Products(products::ProductsArgs),

    /// Log in and publish the new token.
    Login,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Every location was attempted.
    Success = 0,
    /// Configuration error or failed login.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose {
        "runsync=debug,info"
    } else {
        "runsync=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Sync) | None => sync::run(&cli).await,
        Some(Commands::Locations) => locations::run(&cli).await,
        Some(Commands::Products(args)) => products::run(args, &cli).await,
        Some(Commands::Login) => login::run(&cli).await,
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    std::process::exit(code as i32);
}
