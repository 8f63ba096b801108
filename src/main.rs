//! Round-robin HTTP load balancer.
//!
//! Reads its backend list from the environment (or a TOML file), probes every
//! backend in the background, and forwards each request to the next healthy
//! backend in rotation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use lb_proxy::config::{self, Config};
use lb_proxy::lifecycle::{signals, Shutdown};
use lb_proxy::observability::{logging, metrics};
use lb_proxy::{Dispatcher, HttpServer, RoundRobin};

#[derive(Parser)]
#[command(name = "lb-proxy")]
#[command(about = "Round-robin HTTP load balancer with health checks", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables are used when absent.
    #[arg(short, long, env = "LB_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: Config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };

    logging::init(&config.observability.log_level);
    tracing::info!("lb-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.port,
        backends = ?config.backends,
        interval_secs = config.health_check.interval_secs,
        timeout_secs = config.health_check.timeout_secs,
        "Configuration loaded"
    );

    if let Some(raw) = &config.observability.metrics_address {
        let addr: SocketAddr = raw.parse()?;
        metrics::init_metrics(addr);
    }

    let dispatcher = Dispatcher::new(
        &config.backends,
        Box::new(RoundRobin::new()),
        &config.health_check,
    )?;

    let listener = TcpListener::bind(config.listen_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Load balancer listening");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(Arc::new(dispatcher))
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
