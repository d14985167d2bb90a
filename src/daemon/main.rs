mod cmd;
mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use vmreg::{
    api::{
        ApiServer, ApiServerConfig, events::EventService, inventory::InventoryService,
        machine::VmService,
    },
    events::EventSettings,
    inventory::Inventory,
    registry::Registry,
    utils::{id::UuidIdGenerator, tracing::init_tracing},
};

use crate::{cmd::Cli, config::Config};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = Config::load(cli.config_path).await?;
    if let Some(path) = &config.config_path {
        info!("loaded config from {}", path.display());
    }

    let mut api_config = ApiServerConfig::from(&config.api_config);
    if let Some(host) = cli.host {
        api_config.host = host;
    }
    if let Some(port) = cli.port {
        api_config.port = port;
    }

    let registry = Arc::new(Registry::new(Arc::new(UuidIdGenerator)));
    let inventory = Arc::new(Inventory::new());

    let api_server = ApiServer::new(
        registry,
        inventory,
        EventSettings::from(&config.events_config),
        api_config,
    )
    .add_service::<VmService>()
    .add_service::<EventService>()
    .add_service::<InventoryService>();

    api_server.start(shutdown_signal()).await?;

    Ok(())
}
