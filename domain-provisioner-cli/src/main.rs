//! Domain provisioner command-line frontend.
//!
//! Opens the SQLite store, wires `AppState` and runs one admin command.
//! Provisioning jobs queued by `request` and `retry` are drained before the
//! process exits.
//!
//! ```sh
//! domain-provisioner root add --name Play --root-domain play.example.com \
//!     --provider cloudflare --config zone_id=abc --config api_token=xyz
//! domain-provisioner request --server-id 42 --uuid-short a1b2c3d4 --root-id 1
//! ```

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_provisioner_app::adapters::SqliteStore;
use domain_provisioner_app::AppStateBuilder;

use commands::Command;
use config::{CliConfig, SyncOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "domain-provisioner",
    version,
    about = "Provision hostnames for hosted servers under managed root domains"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DOMAIN_PROVISIONER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the database path.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable or disable daemon sync.
    #[arg(long, env = "DOMAIN_SYNC_ENABLED", value_parser = BoolishValueParser::new(), global = true)]
    sync_enabled: Option<bool>,

    /// Node agent endpoint lifecycle events are posted to.
    #[arg(long, env = "DOMAIN_SYNC_ENDPOINT", global = true)]
    sync_endpoint: Option<String>,

    /// Bearer token for the node agent.
    #[arg(long, env = "DOMAIN_SYNC_TOKEN", hide_env_values = true, global = true)]
    sync_token: Option<String>,

    /// Per-request timeout in seconds (0 disables it).
    #[arg(long, env = "DOMAIN_SYNC_TIMEOUT", global = true)]
    sync_timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.apply(SyncOverrides {
        enabled: cli.sync_enabled,
        endpoint: cli.sync_endpoint,
        token: cli.sync_token,
        timeout: cli.sync_timeout,
    });
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level);
    tracing::debug!("Using database {}", config.database_path.display());
    if config.sync.enabled && config.sync.normalized_endpoint().is_none() {
        tracing::warn!("Daemon sync is enabled but no endpoint is configured");
    }

    let store = Arc::new(SqliteStore::new(&config.database_path).await?);
    let state = AppStateBuilder::new()
        .domain_repository(store.clone())
        .root_repository(store)
        .sync_config(config.sync)
        .build()?;

    commands::execute(&state, cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
