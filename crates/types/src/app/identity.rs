// Path: crates/types/src/app/identity.rs

//! Defines the canonical `AccountId` used to identify callers, oracle reporters
//! and verification subjects.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque, stable identifier for an on-chain principal.
///
/// The engine only ever compares account ids for equality; it never derives or
/// verifies them. The caller identity of every call is supplied by the execution
/// environment. Serialized in human-readable formats (JSON, TOML) as a 64-character
/// hex string.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Returns the lowercase hex encoding of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed).map_err(|e| format!("invalid account hex: {}", e))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("account id must be 32 bytes, got {}", b.len()))?;
        Ok(Self(arr))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_hex_parsing() {
        let id = AccountId([0xab; 32]);
        let parsed: AccountId = format!("0x{}", id.to_hex()).parse().unwrap();
        assert_eq!(parsed, id);

        let err = "abcd".parse::<AccountId>().unwrap_err();
        assert!(err.contains("32 bytes"));
        assert!("zz".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_account_id_serializes_as_hex_string() {
        let id = AccountId([1; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
