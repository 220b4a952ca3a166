//! Shared handler state

use feed_store::PriceFeed;
use std::sync::Arc;

/// State handed to every handler
#[derive(Debug)]
pub struct AppState {
    pub feed: Arc<PriceFeed>,
    pub service_name: String,
    pub version: String,
}

impl AppState {
    pub fn new(feed: Arc<PriceFeed>, service_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            feed,
            service_name: service_name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
