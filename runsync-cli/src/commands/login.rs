//! Login command - force a login and publish the new token.

use anyhow::Result;
use serde_json::json;

use super::load_config;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};
use runsync_store::SyncRun;

/// Runs the login command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let secret = config.secret_store.as_ref().map(|s| s.secret_name.clone());

    SyncRun::from_config(&config)?.login().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_login(secret.as_deref()));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(&json!({"logged_in": true, "secret": secret}))?
            );
        }
    }
    Ok(())
}
