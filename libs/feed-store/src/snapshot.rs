//! Persisted store state
//!
//! A snapshot is plain JSON. Collections are sorted so two snapshots of equal
//! state compare and diff equal.

use errors::{FeedError, FeedResult};
use feed_model::{Address, MedianData, PriceData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::access::Ownership;
use crate::gates::FeatureGates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub version: u32,
    pub ownership: Ownership,
    pub admins: Vec<Address>,
    pub relayers: Vec<Address>,
    pub gates: FeatureGates,
    pub whitelist: Vec<Address>,
    pub prices: Vec<PriceData>,
    pub deviations: Vec<PriceData>,
    pub medians: Vec<MedianData>,
}

impl FeedSnapshot {
    pub const VERSION: u32 = 1;

    /// Write to `path` through a temporary sibling file
    pub fn save(&self, path: &Path) -> FeedResult<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        info!(
            "Snapshot saved to {} ({} prices, {} deviations, {} medians)",
            path.display(),
            self.prices.len(),
            self.deviations.len(),
            self.medians.len()
        );
        Ok(())
    }

    pub fn load(path: &Path) -> FeedResult<Self> {
        let bytes = std::fs::read(path)?;
        let snapshot: FeedSnapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != Self::VERSION {
            return Err(FeedError::Serialization(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version,
                Self::VERSION
            )));
        }
        Ok(snapshot)
    }
}
