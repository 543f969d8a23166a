//! Provider balancer demo driver.
//!
//! Assembles a balancer stack from configuration, registers a handful of fake
//! providers, schedules health inspection and fires one task per request.
//!
//! ```text
//!   request tasks ──get()──▶ [health check] ─▶ [capacity limit] ─▶ core ─▶ provider
//!                                  ▲
//!   health monitor ──inspect_all()─┘  (add/remove pushed down on transitions)
//! ```

mod demo;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::task::JoinSet;

use provider_balancer::config::{load_config, BalancerConfig};
use provider_balancer::lifecycle::{signals, Shutdown};
use provider_balancer::load_balancer::{build_from_config, LoadBalancer, Provider};
use provider_balancer::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "provider-balancer")]
#[command(about = "Run a client-side load balancer against demo providers", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of requests to send
    #[arg(short, long, default_value_t = 40)]
    requests: usize,

    /// Delay between requests in milliseconds
    #[arg(long, default_value_t = 250)]
    request_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("provider-balancer v0.1.0 starting");

    if config.observability.metrics_enabled {
        // validated on load
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let built = build_from_config(&config);
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let monitor = built
        .health_monitor(config.health_check.clone())
        .map(|monitor| tokio::spawn(monitor.run(shutdown.subscribe())));

    for provider in demo::providers() {
        built.balancer.add_provider(provider).await;
    }
    tracing::info!(id = %config.id, "Started load balancer");

    let mut stop = shutdown.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_millis(cli.request_interval_ms));
    let mut requests = JoinSet::new();

    for request in 0..cli.requests {
        tokio::select! {
            _ = ticker.tick() => {
                let balancer = built.balancer.clone();
                requests.spawn(async move {
                    match balancer.get().await {
                        Ok(response) => tracing::info!(request, %response, "Response"),
                        Err(e) => tracing::warn!(request, error = %e, "Error"),
                    }
                });
            }
            _ = stop.recv() => break,
        }
    }

    while let Some(joined) = requests.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "Request task failed");
        }
    }

    shutdown.trigger();
    if let Some(monitor) = monitor {
        monitor.await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
