//! Roles, feed kinds and post modes

use errors::FeedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles known to the access registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages roles, feature gates and the whitelist
    Admin,
    /// Publishes price, deviation and median records
    Relayer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Relayer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Relayer => "relayer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" | "default_admin_role" => Ok(Role::Admin),
            "relayer" | "relayer_role" => Ok(Role::Relayer),
            other => Err(FeedError::invalid_parameter(
                "role",
                format!("unknown role '{}', expected admin or relayer", other),
            )),
        }
    }
}

/// The three independent feeds kept per asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Price,
    Deviation,
    Median,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Price => "price",
            FeedKind::Deviation => "deviation",
            FeedKind::Median => "median",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness policy applied to each record of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostMode {
    /// Reject a record unless its resolve time is newer than the stored one
    #[default]
    Strict,
    /// Always overwrite
    Force,
}

impl PostMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, PostMode::Strict)
    }
}

impl From<bool> for PostMode {
    fn from(strict: bool) -> Self {
        if strict {
            PostMode::Strict
        } else {
            PostMode::Force
        }
    }
}
