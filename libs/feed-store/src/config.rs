//! Store tuning knobs

use errors::{FeedError, FeedResult};
use feed_model::AssetKey;
use serde::{Deserialize, Serialize};

/// Default upper bound on records or keys per call
pub const DEFAULT_MAX_BATCH_SIZE: usize = 256;

/// Default number of samples carried by a median record
pub const DEFAULT_MEDIAN_LEN: usize = 10;

/// Default symbol that reference queries treat as the unit of account
pub const DEFAULT_BASE_SYMBOL: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_batch_size: usize,
    pub median_len: usize,
    pub base_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            median_len: DEFAULT_MEDIAN_LEN,
            base_symbol: DEFAULT_BASE_SYMBOL.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> FeedResult<()> {
        if self.max_batch_size == 0 {
            return Err(FeedError::InvalidConfig {
                field: "max_batch_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.median_len == 0 {
            return Err(FeedError::InvalidConfig {
                field: "median_len".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        self.base_key().map_err(|e| FeedError::InvalidConfig {
            field: "base_symbol".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Key of the unit-of-account symbol
    pub fn base_key(&self) -> FeedResult<AssetKey> {
        AssetKey::from_name(&self.base_symbol)
    }
}
