//! geonote: command-line access to the geonotes store.
//!
//! Prints a JSON envelope on stdout. Exits with 0 on success, 2 when the input
//! was rejected, and 1 on any other failure.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use tracing::{error, warn};

use geonote_core::logging::SUBSYSTEM_CLI;
use geonote_db::{log_pool_metrics, Database, DatabaseConfig};

use crate::cli::{Cli, Command};

/// Exit status for input the store rejected.
const EXIT_REJECTED: u8 = 2;

/// Merge command-line overrides into the environment configuration.
fn resolve_config(cli: &Cli) -> geonote_core::Result<DatabaseConfig> {
    let mut config = DatabaseConfig::from_env()?;
    if let Some(ref url) = cli.database_url {
        config = config.with_url(url.clone());
    }
    if let Some(ms) = cli.query_timeout_ms {
        if ms == 0 {
            return Err(geonote_core::Error::Config(
                "--query-timeout-ms must be at least 1".to_string(),
            ));
        }
        config = config.with_query_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

async fn execute(cli: Cli) -> geonote_core::Result<Value> {
    if let Command::Notes(ref command) = cli.command {
        commands::check(command)?;
    }

    let config = resolve_config(&cli)?;
    let db = Database::connect_with_config(&config).await?;

    let result = match cli.command {
        Command::Migrate => db.migrate().await.map(|()| json!({ "migrated": true })),
        Command::Notes(command) => commands::run(&db.notes, command).await,
    };

    log_pool_metrics(db.pool());
    db.pool().close().await;
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_format);

    let (body, code) = match execute(cli).await {
        Ok(body) => (body, ExitCode::SUCCESS),
        Err(err) if err.is_client_error() => {
            warn!(subsystem = SUBSYSTEM_CLI, error = %err, "Request rejected");
            (commands::error_envelope(&err), ExitCode::from(EXIT_REJECTED))
        }
        Err(err) => {
            error!(subsystem = SUBSYSTEM_CLI, error = %err, "Command failed");
            (commands::error_envelope(&err), ExitCode::FAILURE)
        }
    };

    let rendered = serde_json::to_string_pretty(&body).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(code)
}
