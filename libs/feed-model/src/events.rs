//! Notifications emitted for every committed change

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::records::{MedianData, PriceData};
use crate::types::{FeedKind, Role};

/// A single committed change to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
    OwnershipTransferStarted {
        previous_owner: Address,
        new_owner: Address,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    WhitelistStatusChanged {
        enabled: bool,
    },
    MedianStatusChanged {
        disabled: bool,
    },
    AddressWhitelisted {
        account: Address,
    },
    AddressRemovedFromWhitelist {
        account: Address,
    },
    PricePosted {
        record: PriceData,
    },
    DeviationPosted {
        record: PriceData,
    },
    MedianPosted {
        record: MedianData,
    },
}

impl FeedEvent {
    /// Feed touched by this event, `None` for administrative events
    pub fn feed_kind(&self) -> Option<FeedKind> {
        match self {
            FeedEvent::PricePosted { .. } => Some(FeedKind::Price),
            FeedEvent::DeviationPosted { .. } => Some(FeedKind::Deviation),
            FeedEvent::MedianPosted { .. } => Some(FeedKind::Median),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeedEvent::RoleGranted { .. } => "role_granted",
            FeedEvent::RoleRevoked { .. } => "role_revoked",
            FeedEvent::OwnershipTransferStarted { .. } => "ownership_transfer_started",
            FeedEvent::OwnershipTransferred { .. } => "ownership_transferred",
            FeedEvent::WhitelistStatusChanged { .. } => "whitelist_status_changed",
            FeedEvent::MedianStatusChanged { .. } => "median_status_changed",
            FeedEvent::AddressWhitelisted { .. } => "address_whitelisted",
            FeedEvent::AddressRemovedFromWhitelist { .. } => "address_removed_from_whitelist",
            FeedEvent::PricePosted { .. } => "price_posted",
            FeedEvent::DeviationPosted { .. } => "deviation_posted",
            FeedEvent::MedianPosted { .. } => "median_posted",
        }
    }
}

/// Event stamped with the store clock at commit time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Monotonic per-store sequence number, starting at 1
    pub sequence: u64,
    pub timestamp_ms: i64,
    #[serde(flatten)]
    pub event: FeedEvent,
}
