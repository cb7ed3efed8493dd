#![no_main]

use libfuzzer_sys::fuzz_target;

use tidal_bridge::{decode_rate, encode_rate, InboundDelivery};
use tidal_ledger::LedgerSnapshot;

// Everything that arrives from outside the domain: bridge payloads,
// transport envelopes and snapshot files. Decoding must never panic, and a
// payload that decodes must re-encode to the same bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(rate) = decode_rate(data) {
        assert_eq!(&encode_rate(rate)[..], data);
    }

    let _ = bincode::deserialize::<InboundDelivery>(data);

    if let Ok(snapshot) = LedgerSnapshot::from_bytes(data) {
        let _ = snapshot.verify();
    }
});
