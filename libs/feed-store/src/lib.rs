//! Permissioned Price-Feed Store
//!
//! An in-process ledger of per-asset price, deviation and median records that
//! relayers publish and readers query, behind admin-controlled gates.
//!
//! # Key Components
//!
//! - **PriceFeed**: the facade; every public operation goes through it
//! - **AccessControl**: admin/relayer role sets and the two-step ownership handshake
//! - **FeatureGates / Whitelist**: read-side predicates evaluated before any lookup
//! - **FeedTable**: one keyed table per feed kind, with the strict/force freshness policy
//! - **EventNotifier**: broadcast of every committed change
//! - **FeedSnapshot**: JSON persistence of the whole store

pub mod access;
pub mod config;
pub mod gates;
pub mod notify;
pub mod price_feed;
pub mod snapshot;
pub mod storage;
pub mod time;

// Re-exports
pub use access::{AccessControl, Ownership};
pub use config::StoreConfig;
pub use gates::{FeatureGates, Whitelist};
pub use notify::EventNotifier;
pub use price_feed::{FeedStats, PriceFeed, BASE_SYMBOL_VALUE, RATE_SCALE};
pub use snapshot::FeedSnapshot;
pub use storage::FeedTable;
pub use time::{ManualTimeProvider, SystemTimeProvider, TimeProvider};

/// Helper functions for tests and embedding
pub mod helpers {
    use super::{ManualTimeProvider, PriceFeed, StoreConfig};
    use errors::FeedResult;
    use feed_model::{Address, AssetKey};
    use std::sync::Arc;

    /// Deterministic address with every byte set to `byte`
    pub fn test_address(byte: u8) -> Address {
        Address::new([byte; Address::LEN])
    }

    /// Key for a short ASCII asset name
    pub fn asset(name: &str) -> FeedResult<AssetKey> {
        AssetKey::from_name(name)
    }

    /// Create a store owned by `creator` with default limits and a frozen clock
    ///
    /// # Example
    /// ```
    /// use feed_store::helpers::{create_test_feed, test_address};
    ///
    /// let owner = test_address(1);
    /// let feed = create_test_feed(owner).unwrap();
    /// assert_eq!(feed.owner(), owner);
    /// ```
    pub fn create_test_feed(creator: Address) -> FeedResult<Arc<PriceFeed>> {
        create_test_feed_with_config(creator, StoreConfig::default())
    }

    pub fn create_test_feed_with_config(
        creator: Address,
        config: StoreConfig,
    ) -> FeedResult<Arc<PriceFeed>> {
        let feed = PriceFeed::new(creator, config)?
            .with_time_provider(Arc::new(ManualTimeProvider::new(1_700_000_000_000)));
        Ok(Arc::new(feed))
    }
}
