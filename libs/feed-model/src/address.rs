//! Account addresses
//!
//! Callers are identified by a 20-byte address written as `0x` followed by
//! 40 hex digits. The zero address stands for an anonymous caller and never
//! holds a role.

use errors::FeedError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 20-byte account identifier
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; Address::LEN]);

impl Address {
    /// Byte width of an address
    pub const LEN: usize = 20;

    /// The anonymous caller
    pub const ZERO: Address = Address([0u8; Address::LEN]);

    pub const fn new(bytes: [u8; Address::LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Address::LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; Address::LEN]
    }
}

impl FromStr for Address {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut bytes = [0u8; Address::LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| {
            FeedError::InvalidAddress(format!(
                "'{}' is not a 0x-prefixed 40 digit hex address",
                s
            ))
        })?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let addr: Address = "0x00000000000000000000000000000000000000aB".parse().unwrap();
        assert_eq!(
            addr.to_string(),
            "0x00000000000000000000000000000000000000ab"
        );
        assert_eq!(addr.as_bytes()[19], 0xab);
    }

    #[test]
    fn test_parse_without_prefix() {
        let addr: Address = "1111111111111111111111111111111111111111".parse().unwrap();
        assert_eq!(addr, Address::new([0x11; 20]));
    }

    #[test]
    fn test_reject_malformed() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not-an-address".parse::<Address>().is_err());
        assert!("0xzz11111111111111111111111111111111111111"
            .parse::<Address>()
            .is_err());
        // odd digit count and one byte too many
        assert!("0x111111111111111111111111111111111111111"
            .parse::<Address>()
            .is_err());
        assert!("0x111111111111111111111111111111111111111111"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn test_parse_upper_case_digits() {
        let addr: Address = "0XABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD".parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0xab);
        assert_eq!(
            addr.to_string(),
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"
        );
    }

    #[test]
    fn test_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::new([1; 20]).is_zero());
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::new([0x22; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x2222222222222222222222222222222222222222\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
