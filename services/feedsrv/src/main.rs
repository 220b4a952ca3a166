//! Feed Service (feedsrv) entry point

use anyhow::Result;
use clap::Parser;
use common::{init_logging, print_startup_banner, shutdown_channel, ServiceInfo};
use feedsrv::config::DEFAULT_PORT;
use feedsrv::{build_feed, serve, Args, FeedsrvConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before logging so the logging section applies
    let config = FeedsrvConfig::load(&args)?;

    let service_info = ServiceInfo::new(
        config.service.name.clone(),
        env!("CARGO_PKG_VERSION"),
        "Permissioned price-feed store",
        DEFAULT_PORT,
    );
    init_logging(&service_info, &config.logging)?;
    print_startup_banner(&service_info);

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    let feed = build_feed(&config)?;
    let listener = TcpListener::bind(config.api.bind_address()).await?;

    // the trigger is unused here; Ctrl+C/SIGTERM end the process
    let (_trigger, signal) = shutdown_channel();
    serve(config, feed, listener, signal).await
}
