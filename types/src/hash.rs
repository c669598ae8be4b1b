//! Share identifier type.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte share hash, stored big-endian.
///
/// The all-zero value is reserved: as a `previous_hash` it means the author
/// declared no parent. Because the bytes are big-endian, the derived ordering
/// is the numeric ordering of the hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShareHash([u8; 32]);

impl Default for ShareHash {
    fn default() -> Self {
        Self::NULL
    }
}

impl ShareHash {
    pub const NULL: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Interpret the hash as a 256-bit integer.
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    pub fn from_u256(value: U256) -> Self {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        Self(bytes)
    }
}

impl From<u64> for ShareHash {
    fn from(value: u64) -> Self {
        Self::from_u256(U256::from(value))
    }
}

impl fmt::Debug for ShareHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for ShareHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Parses the 64-character hex form produced by `Display`.
impl FromStr for ShareHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default_and_zero() {
        assert!(ShareHash::default().is_null());
        assert!(!ShareHash::from(1).is_null());
    }

    #[test]
    fn from_u64_places_value_in_low_bytes() {
        let hash = ShareHash::from(0x0102);
        assert_eq!(hash.as_bytes()[30], 0x01);
        assert_eq!(hash.as_bytes()[31], 0x02);
        assert_eq!(hash.to_u256(), U256::from(0x0102));
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ShareHash::from(0xff);
        let s = hash.to_string();
        assert_eq!(s.len(), 64);
        assert!(s.ends_with("ff"));
        assert!(s.starts_with("00"));
    }

    #[test]
    fn parses_its_display_form() {
        let hash = ShareHash::from(0xdead_beef);
        assert_eq!(hash.to_string().parse::<ShareHash>(), Ok(hash));
    }

    #[test]
    fn rejects_short_or_non_hex_input() {
        assert!("abcd".parse::<ShareHash>().is_err());
        assert!("zz".repeat(32).parse::<ShareHash>().is_err());
    }
}
