//! Block identifiers
//!
//! Block hashes are opaque 32-byte values. They are only compared for
//! equality and ordered for map lookups; no numeric meaning is attached.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-byte block hash
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Create a zero hash (the "no previous block" marker)
    pub const fn zero() -> Self {
        Hash([0u8; 32])
    }

    /// Parse 64 hex digits, with or without a leading `0x`
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        let mut arr = [0u8; 32];
        hex::decode_to_slice(digits, &mut arr)?;
        Ok(Hash(arr))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short prefix for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::zero()
    }
}

/// Hash arbitrary bytes using BLAKE3
pub fn hash_bytes(data: &[u8]) -> Hash {
    let hash = blake3::hash(data);
    Hash(*hash.as_bytes())
}

/// Deterministic identifier for a synthetic block at `height` on `branch`
///
/// Used by tooling and tests to build chains without real block bodies.
pub fn synthetic_block_hash(branch: &str, height: u64) -> Hash {
    let mut data = Vec::with_capacity(branch.len() + 8);
    data.extend_from_slice(branch.as_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    hash_bytes(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash_bytes(b"block"), hash_bytes(b"block"));
        assert_ne!(hash_bytes(b"block"), hash_bytes(b"other"));
    }

    #[test]
    fn test_from_hex_with_prefix() {
        let plain = Hash::from_hex(
            "0000060d6aaaf8d5f835567060dcfbff843677d10b92ef0e0036cb9b126a9ff0",
        )
        .unwrap();
        let prefixed = Hash::from_hex(
            "0x0000060d6aaaf8d5f835567060dcfbff843677d10b92ef0e0036cb9b126a9ff0",
        )
        .unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.0[2], 0x06);
        assert_eq!(plain.0[31], 0xf0);
    }

    #[test]
    fn test_from_hex_rejects_bad_length() {
        assert!(Hash::from_hex("0xabcd").is_err());
        assert!(Hash::from_hex("zz").is_err());
    }

    #[test]
    fn test_display_is_hex() {
        let hash = hash_bytes(b"test");
        assert_eq!(hash.to_string(), hash.to_hex());
        assert_eq!(Hash::from_hex(&hash.to_hex()).unwrap(), hash);
        assert_eq!(hash.short().len(), 12);
    }

    #[test]
    fn test_synthetic_hashes_differ_per_branch() {
        assert_ne!(synthetic_block_hash("a", 5), synthetic_block_hash("b", 5));
        assert_ne!(synthetic_block_hash("a", 5), synthetic_block_hash("a", 6));
    }
}
