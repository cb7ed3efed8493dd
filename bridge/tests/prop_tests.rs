//! Property-based tests for the bridge adapter.

use proptest::prelude::*;
use tidal_bridge::{
    decode_rate, encode_rate, AdapterConfig, BridgeAdapter, BridgeError, InboundDelivery,
    OutboundRequest, RemoteRoute, RouteValidator, RoutingTable,
};
use tidal_ledger::{AccessPolicy, Ledger};
use tidal_types::{Address, DeliveryId, DomainId, Timestamp};

fn addr(name: &str) -> Address {
    Address::new(format!("tdl_{name}"))
}

struct Side {
    ledger: Ledger,
    adapter: BridgeAdapter<RouteValidator>,
}

fn side(me: &str, peer: &str, peer_domain: u32) -> Side {
    let ledger = Ledger::new(
        AccessPolicy::new(addr("owner")).with_privileged([addr("custody"), addr(me)]),
    );
    let routes = RoutingTable::new().with_route(
        DomainId::new(peer_domain),
        RemoteRoute {
            remote_adapter: addr(peer),
            remote_token: addr("token"),
        },
    );
    let adapter = BridgeAdapter::new(
        addr(me),
        AccessPolicy::new(addr("owner")).with_privileged([addr("router")]),
        routes,
        RouteValidator::new(),
        AdapterConfig::default(),
    );
    Side { ledger, adapter }
}

proptest! {
    #[test]
    fn payload_round_trips(rate in any::<u128>()) {
        prop_assert_eq!(decode_rate(&encode_rate(rate)).unwrap(), rate);
    }

    #[test]
    fn payload_of_wrong_length_is_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() != 32);
        prop_assert!(matches!(decode_rate(&bytes), Err(BridgeError::MalformedPayload(_))));
    }

    /// Bridging moves the amount across and the receiver ends up with the
    /// sender's locked rate.
    #[test]
    fn round_trip_preserves_amount_and_rate(
        funded in 1u128..1_000_000_000_000,
        fraction in 1u128..=100,
        rate in 0u128..1_000_000_000_000,
        at in 0u64..10_000_000,
    ) {
        let mut source = side("adapter1", "adapter2", 2);
        let mut dest = side("adapter2", "adapter1", 1);
        let now = Timestamp::new(at);
        let amount = (funded * fraction / 100).max(1);

        source.ledger.grant(&addr("custody"), &addr("alice"), funded, rate, now).unwrap();
        let msg = source.adapter.lock_or_burn(&mut source.ledger, &OutboundRequest {
            caller: addr("router"),
            sender: addr("alice"),
            receiver: addr("bob"),
            amount,
            remote_domain: DomainId::new(2),
        }, now).unwrap();

        let receipt = dest.adapter.release_or_mint(&mut dest.ledger, &InboundDelivery {
            caller: addr("router"),
            source_domain: DomainId::new(1),
            source_adapter: addr("adapter1"),
            delivery_id: DeliveryId::new([7u8; 32]),
            receiver: msg.receiver.clone(),
            amount: msg.amount,
            payload: msg.payload.to_vec(),
        }, now).unwrap();

        prop_assert_eq!(receipt.amount, amount);
        prop_assert_eq!(dest.ledger.locked_rate(&addr("bob")), rate);
        prop_assert_eq!(
            source.ledger.total_supply() + dest.ledger.total_supply(),
            funded
        );
        prop_assert!(source.ledger.check_supply());
        prop_assert!(dest.ledger.check_supply());
    }
}
