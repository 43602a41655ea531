//! Machine extension proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               MACHINE PROXY                   │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ routing  │──▶│ registry  │──┼──▶ Machine API
//!                    │  │ server  │   │ resolver │   │  lookup   │  │
//!                    │  └─────────┘   └────┬─────┘   └───────────┘  │
//!                    │                     │                        │
//!                    │                     ▼                        │
//!   Client Response  │  ┌─────────┐   ┌──────────┐                  │
//!   ◀────────────────┼──│ relayed │◀──│ outbound │◀─────────────────┼──── Extension API
//!                    │  │response │   │ exchange │                  │     (in machine)
//!                    │  └─────────┘   └──────────┘                  │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use machine_proxy::config::{loader, ProxyConfig, RegistryMode};
use machine_proxy::http::HttpServer;
use machine_proxy::lifecycle::{signals, Shutdown};
use machine_proxy::observability::{logging, metrics};
use machine_proxy::registry::{HttpMachineRegistry, InMemoryRegistry, MachineRegistry};

#[derive(Debug, Parser)]
#[command(
    name = "machine-proxy",
    about = "Routes requests to extension APIs hosted in machines"
)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_port = config.extension.api_port,
        registry_mode = ?config.registry.mode,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let registry: Arc<dyn MachineRegistry> = match config.registry.mode {
        RegistryMode::Http => Arc::new(HttpMachineRegistry::new(config.registry.endpoint.clone())),
        RegistryMode::Static => Arc::new(InMemoryRegistry::from_config(&config.registry.machines)),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::listen(&shutdown).await;
    });

    let server = HttpServer::new(config, registry);
    server.run(listener, receiver).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
