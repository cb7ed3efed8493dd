use proptest::prelude::*;

use tidal_types::{Address, DeliveryId, DomainId, Timestamp};

proptest! {
    /// DeliveryId roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn delivery_id_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = DeliveryId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
        prop_assert_eq!(id.is_zero(), bytes == [0u8; 32]);
    }

    /// DeliveryId displays as 64 lowercase hex characters.
    #[test]
    fn delivery_id_display_is_hex(bytes in prop::array::uniform32(0u8..)) {
        let shown = DeliveryId::new(bytes).to_string();
        prop_assert_eq!(shown.len(), 64);
        prop_assert!(shown.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Elapsed time is the saturating difference.
    #[test]
    fn timestamp_elapsed(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a).elapsed_since(Timestamp::new(b)), b.saturating_sub(a));
    }

    /// Any alphanumeric suffix after the prefix parses.
    #[test]
    fn address_parse_accepts_alphanumeric(suffix in "[a-zA-Z0-9_]{1,40}") {
        let raw = format!("tdl_{suffix}");
        let addr = Address::parse(raw.clone()).unwrap();
        prop_assert_eq!(addr.as_str(), raw.as_str());
    }

    /// DomainId bincode roundtrip.
    #[test]
    fn domain_id_bincode_roundtrip(id in any::<u32>()) {
        let domain = DomainId::new(id);
        let encoded = bincode::serialize(&domain).unwrap();
        let decoded: DomainId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, domain);
    }
}
