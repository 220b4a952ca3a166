//! Read-side feature gates and the query whitelist

use feed_model::Address;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Two independent admin-controlled flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGates {
    pub whitelist_enabled: bool,
    pub median_query_disabled: bool,
}

impl FeatureGates {
    /// `!whitelist_enabled || caller in whitelist`
    pub fn allowed(&self, whitelist: &Whitelist, caller: &Address) -> bool {
        !self.whitelist_enabled || whitelist.contains(caller)
    }

    pub fn median_allowed(&self) -> bool {
        !self.median_query_disabled
    }
}

/// Addresses permitted to query while the whitelist gate is on
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    members: FxHashSet<Address>,
}

impl Whitelist {
    /// Returns `true` if newly added
    pub fn insert(&mut self, account: Address) -> bool {
        self.members.insert(account)
    }

    /// Returns `true` if it was present
    pub fn remove(&mut self, account: &Address) -> bool {
        self.members.remove(account)
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.members.contains(account)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn sorted(&self) -> Vec<Address> {
        let mut members: Vec<Address> = self.members.iter().copied().collect();
        members.sort();
        members
    }
}

impl FromIterator<Address> for Whitelist {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
