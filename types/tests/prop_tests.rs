use proptest::prelude::*;

use sharechain_types::{ShareHash, Timestamp, U256};

proptest! {
    /// ShareHash keeps its bytes.
    #[test]
    fn share_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ShareHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// ShareHash::is_null is true only for all-zero bytes.
    #[test]
    fn share_hash_is_null_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = ShareHash::new(bytes);
        prop_assert_eq!(hash.is_null(), bytes == [0u8; 32]);
    }

    /// Byte ordering agrees with numeric ordering, which the tip tie-break relies on.
    #[test]
    fn share_hash_order_is_numeric(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        let (ha, hb) = (ShareHash::new(a), ShareHash::new(b));
        prop_assert_eq!(ha.cmp(&hb), ha.to_u256().cmp(&hb.to_u256()));
    }

    /// Converting through U256 is lossless.
    #[test]
    fn share_hash_u256_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ShareHash::new(bytes);
        prop_assert_eq!(ShareHash::from_u256(hash.to_u256()), hash);
    }

    /// Display output is always 64 lowercase hex characters.
    #[test]
    fn share_hash_display_is_hex(bytes in prop::array::uniform32(0u8..)) {
        let s = ShareHash::new(bytes).to_string();
        prop_assert_eq!(s.len(), 64);
        prop_assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// elapsed_since never underflows.
    #[test]
    fn timestamp_elapsed_saturates(a in any::<u64>(), b in any::<u64>()) {
        let elapsed = Timestamp::new(a).elapsed_since(Timestamp::new(b));
        prop_assert_eq!(elapsed, b.saturating_sub(a));
    }

    /// Small integers survive the U256 conversion.
    #[test]
    fn share_hash_from_u64(value in any::<u64>()) {
        prop_assert_eq!(ShareHash::from(value).to_u256(), U256::from(value));
    }
}
