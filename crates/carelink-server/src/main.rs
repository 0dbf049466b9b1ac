//! # CareLink Server
//!
//! Entry point: loads configuration, installs logging and hands over to
//! [`carelink_server::app::run`].

use carelink_config::ConfigLoader;
use carelink_core::telemetry::init_telemetry;
use carelink_core::CarelinkResult;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("carelink-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CarelinkResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&config.observability.telemetry(&config.app.name))?;

    info!("Starting CareLink server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    carelink_server::app::run(config).await
}
