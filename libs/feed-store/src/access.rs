//! Role registry and two-step ownership
//!
//! The owner moves through `Stable -> PendingTransfer -> Stable`. Claiming swaps
//! admin and relayer from the previous owner to the new one in a single step, so
//! there is never a state where control has left one owner without reaching the
//! next.

use errors::{unauthorized, FeedError, FeedResult};
use feed_model::{Address, Role};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Ownership state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Ownership {
    Stable { owner: Address },
    PendingTransfer { owner: Address, pending: Address },
}

impl Ownership {
    pub fn owner(&self) -> Address {
        match self {
            Ownership::Stable { owner } | Ownership::PendingTransfer { owner, .. } => *owner,
        }
    }

    pub fn pending(&self) -> Option<Address> {
        match self {
            Ownership::Stable { .. } => None,
            Ownership::PendingTransfer { pending, .. } => Some(*pending),
        }
    }
}

/// Role sets plus ownership
#[derive(Debug, Clone)]
pub struct AccessControl {
    admins: FxHashSet<Address>,
    relayers: FxHashSet<Address>,
    ownership: Ownership,
}

impl AccessControl {
    /// Creator becomes owner, admin and relayer
    pub fn new(creator: Address) -> FeedResult<Self> {
        ensure_nonzero("creator", &creator)?;
        let mut access = Self {
            admins: FxHashSet::default(),
            relayers: FxHashSet::default(),
            ownership: Ownership::Stable { owner: creator },
        };
        access.admins.insert(creator);
        access.relayers.insert(creator);
        Ok(access)
    }

    /// Rebuild from persisted parts
    pub fn from_parts(
        ownership: Ownership,
        admins: impl IntoIterator<Item = Address>,
        relayers: impl IntoIterator<Item = Address>,
    ) -> FeedResult<Self> {
        ensure_nonzero("owner", &ownership.owner())?;
        let access = Self {
            admins: admins.into_iter().collect(),
            relayers: relayers.into_iter().collect(),
            ownership,
        };
        if access.admins.contains(&Address::ZERO) || access.relayers.contains(&Address::ZERO) {
            return Err(FeedError::invalid_parameter(
                "roles",
                "zero address cannot hold a role",
            ));
        }
        Ok(access)
    }

    fn members(&self, role: Role) -> &FxHashSet<Address> {
        match role {
            Role::Admin => &self.admins,
            Role::Relayer => &self.relayers,
        }
    }

    fn members_mut(&mut self, role: Role) -> &mut FxHashSet<Address> {
        match role {
            Role::Admin => &mut self.admins,
            Role::Relayer => &mut self.relayers,
        }
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members(role).contains(account)
    }

    /// Sorted member list, for snapshots and listings
    pub fn role_members(&self, role: Role) -> Vec<Address> {
        let mut members: Vec<Address> = self.members(role).iter().copied().collect();
        members.sort();
        members
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.ownership.pending()
    }

    /// Fails with `Unauthorized` unless `caller` holds `role`
    pub fn ensure_role(&self, role: Role, caller: &Address) -> FeedResult<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(unauthorized!("{} does not hold the {} role", caller, role))
        }
    }

    /// Returns `true` if the account did not already hold the role
    pub fn grant(&mut self, role: Role, account: Address) -> FeedResult<bool> {
        ensure_nonzero("address", &account)?;
        Ok(self.members_mut(role).insert(account))
    }

    /// Returns `true` if the account held the role
    pub fn revoke(&mut self, role: Role, account: &Address) -> bool {
        self.members_mut(role).remove(account)
    }

    /// Name `new_owner` as pending owner; replaces any earlier pending target
    pub fn begin_transfer(&mut self, caller: &Address, new_owner: Address) -> FeedResult<()> {
        let owner = self.owner();
        if *caller != owner {
            return Err(unauthorized!("{} is not the owner", caller));
        }
        ensure_nonzero("new_owner", &new_owner)?;
        self.ownership = Ownership::PendingTransfer {
            owner,
            pending: new_owner,
        };
        Ok(())
    }

    /// Complete the pending transfer; returns the previous owner
    pub fn claim(&mut self, caller: &Address) -> FeedResult<Address> {
        let (previous, pending) = match self.ownership {
            Ownership::Stable { .. } => return Err(FeedError::NoPendingTransfer),
            Ownership::PendingTransfer { owner, pending } => (owner, pending),
        };
        if *caller != pending {
            return Err(unauthorized!("{} is not the pending owner", caller));
        }

        // revoke before grant so a self-transfer keeps both roles
        for role in Role::ALL {
            self.members_mut(role).remove(&previous);
        }
        for role in Role::ALL {
            self.members_mut(role).insert(pending);
        }
        self.ownership = Ownership::Stable { owner: pending };
        Ok(previous)
    }
}

fn ensure_nonzero(param: &str, address: &Address) -> FeedResult<()> {
    if address.is_zero() {
        return Err(FeedError::invalid_parameter(
            param,
            "zero address is not allowed",
        ));
    }
    Ok(())
}
