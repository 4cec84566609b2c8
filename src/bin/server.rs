//! HTTP API binary for sentiscope.
//!
//! Serves the chat and analysis routes described in `sentiscope::server`.
//! Logs go to stderr (plus the configured file, if any).

use clap::Parser;
use sentiscope::{SentiscopeConfig, logging, server};
use std::path::PathBuf;

/// Sentiscope HTTP server.
#[derive(Parser)]
#[command(name = "sentiscope-server", version, about)]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(SentiscopeConfig::default_config_path);
    let mut config = SentiscopeConfig::load_or_default(&config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let _log_guard = logging::init(&config.logging)?;
    tracing::info!(config = %config_path.display(), "sentiscope-server starting");

    server::run_server(&config).await.map_err(|e| {
        tracing::error!(error = %e, "sentiscope-server exited with error");
        e
    })?;

    tracing::info!("sentiscope-server shut down cleanly");
    Ok(())
}
