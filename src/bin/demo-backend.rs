//! Demo backend that greets with the port it listens on.

use std::net::SocketAddr;

use axum::{routing::any, Router};
use clap::Parser;
use tokio::net::TcpListener;

use lb_proxy::lifecycle::signals;
use lb_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "demo-backend")]
#[command(about = "Toy upstream server for trying out the load balancer", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PORT", default_value_t = 8081)]
    port: u16,
}

fn greeting(port: u16) -> String {
    format!("Hello from backend server on port {}!", port)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init("info");

    let body = greeting(cli.port);
    let handler = move || {
        let body = body.clone();
        async move { body }
    };
    let app = Router::new()
        .route("/", any(handler.clone()))
        .route("/{*path}", any(handler));

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(port = cli.port, "Backend server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(signals::shutdown_signal())
        .await?;
    Ok(())
}
