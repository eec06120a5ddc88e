use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use beatbooks_gateway::config::{load_config, GatewayConfig};
use beatbooks_gateway::{observability, GatewayServer, Shutdown};

#[derive(Parser)]
#[command(
    name = "beatbooks-gateway",
    about = "API gateway for the BeatTheBooks data and model services"
)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_service = %config.upstreams.data.base_url,
        model_service = %config.upstreams.model.base_url,
        failure_threshold = config.circuit_breaker.failure_threshold,
        max_attempts = config.retries.max_attempts,
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
