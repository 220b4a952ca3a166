//! Request and response bodies

use feed_model::{Address, AssetKey, MedianData, PriceData, Role};
use feed_store::{FeatureGates, FeedStats};
use serde::{Deserialize, Serialize};

/// Health probe body
pub const HEALTH_OK: &str = "ok";

fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferOwnershipRequest {
    pub new_owner: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
    pub address: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayersRequest {
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistStatusRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedianStatusRequest {
    pub disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistRequest {
    pub address: Address,
}

/// Batch post; `strict` defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct PostRequest<R> {
    pub records: Vec<R>,
    #[serde(default = "default_strict")]
    pub strict: bool,
}

pub type PricePostRequest = PostRequest<PriceData>;
pub type MedianPostRequest = PostRequest<MedianData>;

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsQuery {
    pub assets: Vec<AssetKey>,
}

/// Pairs are `[base, quote]`
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceQuery {
    pub pairs: Vec<(AssetKey, AssetKey)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnershipResponse {
    pub owner: Address,
    pub pending_owner: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub role: Role,
    pub address: Address,
    pub granted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhitelistEntryResponse {
    pub address: Address,
    pub whitelisted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatesResponse {
    pub whitelist_enabled: bool,
    pub median_query_disabled: bool,
}

impl From<FeatureGates> for GatesResponse {
    fn from(gates: FeatureGates) -> Self {
        Self {
            whitelist_enabled: gates.whitelist_enabled,
            median_query_disabled: gates.median_query_disabled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub stats: FeedStats,
}
