//! Fixed-width asset keys
//!
//! An asset key is 32 bytes. Keys built from a human-readable name hold the
//! UTF-8 bytes left-aligned and zero-padded, so `"asset0"` and the raw
//! 32-byte form `0x6173736574300000...` name the same feed.

use errors::FeedError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte asset identifier
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey([u8; AssetKey::LEN]);

impl AssetKey {
    /// Byte width of a key
    pub const LEN: usize = 32;

    /// Longest name that still leaves a terminating zero byte
    pub const MAX_NAME_LEN: usize = AssetKey::LEN - 1;

    pub const fn new(bytes: [u8; AssetKey::LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a key from an asset name
    ///
    /// # Errors
    /// `InvalidAssetKey` if the name is empty, longer than 31 bytes, or
    /// contains a NUL byte.
    pub fn from_name(name: &str) -> Result<Self, FeedError> {
        if name.is_empty() {
            return Err(FeedError::InvalidAssetKey(
                "asset name cannot be empty".to_string(),
            ));
        }
        if name.len() > Self::MAX_NAME_LEN {
            return Err(FeedError::InvalidAssetKey(format!(
                "asset name '{}' is {} bytes, maximum is {}",
                name,
                name.len(),
                Self::MAX_NAME_LEN
            )));
        }
        if name.as_bytes().contains(&0) {
            return Err(FeedError::InvalidAssetKey(format!(
                "asset name '{}' contains a NUL byte",
                name.escape_debug()
            )));
        }

        let mut bytes = [0u8; Self::LEN];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; AssetKey::LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; Self::LEN]
    }

    /// The human-readable name, if this key was built from one
    pub fn name(&self) -> Option<&str> {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(Self::LEN);
        if end == 0 || self.0[end..].iter().any(|b| *b != 0) {
            return None;
        }
        std::str::from_utf8(&self.0[..end]).ok()
    }
}

impl FromStr for AssetKey {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x") {
            if digits.len() == Self::LEN * 2 {
                let mut bytes = [0u8; Self::LEN];
                hex::decode_to_slice(digits, &mut bytes).map_err(|_| {
                    FeedError::InvalidAssetKey(format!("'{}' is not valid hex", s))
                })?;
                return Ok(AssetKey(bytes));
            }
        }
        Self::from_name(s)
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

impl fmt::Debug for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetKey({})", self)
    }
}

impl Serialize for AssetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
