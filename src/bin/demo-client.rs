//! Demo client that fires a burst of staggered concurrent requests.

use std::time::Duration;

use clap::Parser;
use tokio::task::JoinSet;

#[derive(Parser)]
#[command(name = "demo-client")]
#[command(about = "Send a burst of requests through the load balancer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Total number of requests.
    #[arg(short = 'n', long, default_value_t = 20)]
    requests: usize,

    /// Delay between starting two requests.
    #[arg(short, long, default_value_t = 100)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let mut tasks = JoinSet::new();

    for id in 0..cli.requests {
        let client = client.clone();
        let url = cli.url.clone();
        tasks.spawn(async move {
            match client.get(&url).send().await {
                Ok(res) => println!("Request {}: Status {}", id, res.status()),
                Err(e) => println!("Request {} failed: {}", id, e),
            }
        });
        tokio::time::sleep(Duration::from_millis(cli.interval_ms)).await;
    }

    while tasks.join_next().await.is_some() {}
    Ok(())
}
