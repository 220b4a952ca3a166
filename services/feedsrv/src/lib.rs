//! Feed Service (feedsrv)
//!
//! HTTP front end for the permissioned price-feed store. The store lives in
//! memory; when `store.snapshot_path` is configured it is restored at startup
//! and written back after a graceful shutdown.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;

pub use api::create_router;
pub use app_state::AppState;
pub use config::{Args, FeedsrvConfig};

use common::ShutdownSignal;
use errors::FeedResult;
use feed_store::{FeedSnapshot, PriceFeed};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Restore the store from its snapshot, or create an empty one owned by
/// `store.creator`
pub fn build_feed(config: &FeedsrvConfig) -> FeedResult<Arc<PriceFeed>> {
    let store_config = config.store.store_config();

    if let Some(path) = config.store.snapshot_path.as_deref() {
        if path.exists() {
            let snapshot = FeedSnapshot::load(path)?;
            let feed = PriceFeed::from_snapshot(snapshot, store_config)?;
            let stats = feed.stats();
            info!(
                "Restored store from {}: {} prices, {} deviations, {} medians",
                path.display(),
                stats.prices,
                stats.deviations,
                stats.medians
            );
            return Ok(Arc::new(feed));
        }
        info!("No snapshot at {}, starting empty", path.display());
    }

    let creator = config.creator()?;
    info!("Creating empty store owned by {}", creator);
    Ok(Arc::new(PriceFeed::new(creator, store_config)?))
}

/// Write the store to the configured snapshot path, if any
pub fn save_snapshot(config: &FeedsrvConfig, feed: &PriceFeed) -> FeedResult<()> {
    match config.store.snapshot_path.as_deref() {
        Some(path) => feed.snapshot().save(path),
        None => Ok(()),
    }
}

/// Serve until `shutdown` resolves, then persist the store
pub async fn serve(
    config: FeedsrvConfig,
    feed: Arc<PriceFeed>,
    listener: TcpListener,
    shutdown: ShutdownSignal,
) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&feed), config.service.name.clone());
    let app = create_router(state);

    info!("{} listening on {}", config.service.name, listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    if let Err(e) = save_snapshot(&config, &feed) {
        warn!("Failed to save snapshot: {}", e);
        return Err(e.into());
    }
    info!("{} stopped", config.service.name);
    Ok(())
}
