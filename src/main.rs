//! Employee directory service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (axum) ──▶ DirectoryService ──┬──▶ DirectorySnapshotCache ──┐
//!                                                 │      (single-flight)        │
//!                                                 └──▶ DirectoryClient ◀────────┘
//!                                                        │
//!                                                        ▼
//!                                                 RetryingTransport (429 backoff)
//!                                                        │
//!                                                        ▼
//!                                                 HttpTransport (reqwest) ──▶ Upstream
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use employee_directory::config::{load_config, validate_config, ConfigError, DirectoryConfig};
use employee_directory::observability::{logging, metrics};
use employee_directory::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "employee-directory")]
#[command(about = "Caching front for the employee directory API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `upstream.base_url`.
    #[arg(long)]
    upstream_url: Option<String>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<DirectoryConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DirectoryConfig::default(),
    };
    if let Some(url) = &cli.upstream_url {
        config.upstream.base_url = url.clone();
    }
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!("employee-directory v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        max_retries = config.retries.max_retries,
        base_delay_ms = config.retries.base_delay_ms,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
