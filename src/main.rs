use std::path::PathBuf;

use clap::Parser;
use pairwatch::adapter::log_buffer::LogBuffer;
use pairwatch::app::App;
use pairwatch::config::Config;
use tokio::signal;
use tracing::{error, info};

/// Publish the most traded markets of a Stellar Horizon server.
#[derive(Debug, Parser)]
#[command(name = "pairwatch", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e.chain());
            std::process::exit(1);
        }
    };

    let logs = LogBuffer::new(config.logging.buffer_capacity);
    config.logging.init(&logs);
    info!(config = %cli.config.display(), "pairwatch starting");

    let app = match App::start(&config, logs) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e.chain(), "Fatal error");
            std::process::exit(1);
        }
    };

    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");

    match app.snapshots().latest() {
        Some(snapshot) => info!(
            markets = snapshot.len(),
            timestamp = %snapshot.timestamp,
            "Latest snapshot"
        ),
        None => info!("No snapshot was published"),
    }

    app.shutdown().await;
    info!("pairwatch stopped");
}
