//! Feed records and post outcomes

use serde::{Deserialize, Serialize};

use crate::asset::AssetKey;
use crate::types::FeedKind;

/// Common view over the record types kept in a feed table
pub trait FeedEntry: Clone + Default + Send + Sync + 'static {
    fn asset_name(&self) -> &AssetKey;
    fn resolve_time(&self) -> u64;
}

/// A price or deviation sample for one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    pub asset_name: AssetKey,
    pub value: u64,
    /// Source/round identifier supplied by the relayer
    pub id: u64,
    /// Unix timestamp at which `value` was observed
    pub resolve_time: u64,
}

impl PriceData {
    pub fn new(asset_name: AssetKey, value: u64, id: u64, resolve_time: u64) -> Self {
        Self {
            asset_name,
            value,
            id,
            resolve_time,
        }
    }
}

impl FeedEntry for PriceData {
    fn asset_name(&self) -> &AssetKey {
        &self.asset_name
    }

    fn resolve_time(&self) -> u64 {
        self.resolve_time
    }
}

/// Median samples from independent sources for one asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedianData {
    pub asset_name: AssetKey,
    pub values: Vec<u64>,
    pub id: u64,
    pub resolve_time: u64,
}

impl MedianData {
    pub fn new(asset_name: AssetKey, values: Vec<u64>, id: u64, resolve_time: u64) -> Self {
        Self {
            asset_name,
            values,
            id,
            resolve_time,
        }
    }
}

impl FeedEntry for MedianData {
    fn asset_name(&self) -> &AssetKey {
        &self.asset_name
    }

    fn resolve_time(&self) -> u64 {
        self.resolve_time
    }
}

/// Why a single record of a strict post was not committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Posted resolve time is not newer than the stored one
    Stale { stored: u64, posted: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub asset_name: AssetKey,
    #[serde(flatten)]
    pub reason: RejectReason,
}

/// Outcome of one post call
///
/// Success of the call does not imply every record landed: records skipped by
/// the freshness policy are listed in `rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReport {
    pub kind: FeedKind,
    /// Keys committed, in batch order
    pub accepted: Vec<AssetKey>,
    pub rejected: Vec<RejectedRecord>,
}

impl PostReport {
    pub fn new(kind: FeedKind) -> Self {
        Self {
            kind,
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn all_accepted(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Rate of a base asset expressed in a quote asset, scaled by 1e18
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Serialized as a decimal string; JSON numbers lose precision past 2^53
    #[serde(with = "u128_decimal")]
    pub rate: u128,
    pub last_updated_base: u64,
    pub last_updated_quote: u64,
}

mod u128_decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
