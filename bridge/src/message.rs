//! Requests into the adapter and the message that crosses domains.

use serde::{Deserialize, Serialize};
use tidal_types::{Address, DeliveryId, DomainId};

use crate::error::BridgeError;
use crate::payload::{decode_rate, encode_rate, PAYLOAD_LEN};

/// The logical content of a cross-domain transfer.
///
/// Only `rate` is in the wire payload; `amount` travels in the transport
/// envelope next to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    pub amount: u128,
    pub rate: u128,
}

impl BridgeMessage {
    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        encode_rate(self.rate)
    }

    /// Reassemble a message from an envelope amount and a raw payload.
    pub fn from_envelope(amount: u128, payload: &[u8]) -> Result<Self, BridgeError> {
        Ok(Self {
            amount,
            rate: decode_rate(payload)?,
        })
    }
}

/// Ask the source-side adapter to debit `sender` and emit a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Whoever is driving the adapter (the transport router).
    pub caller: Address,
    /// Holder being debited on this domain.
    pub sender: Address,
    /// Holder to credit on the remote domain.
    pub receiver: Address,
    /// Units to move, or `WITHDRAW_ALL`.
    pub amount: u128,
    pub remote_domain: DomainId,
}

/// A transport envelope arriving at the destination-side adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundDelivery {
    /// Whoever is driving the adapter (the transport router).
    pub caller: Address,
    pub source_domain: DomainId,
    /// Identity of the adapter that emitted the message.
    pub source_adapter: Address,
    /// Transport-assigned id; identical across redeliveries.
    pub delivery_id: DeliveryId,
    pub receiver: Address,
    pub amount: u128,
    pub payload: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_reassembles_message() {
        let msg = BridgeMessage {
            amount: 1_000,
            rate: 50_000_000_000,
        };
        let back = BridgeMessage::from_envelope(msg.amount, &msg.payload()).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn envelope_with_bad_payload_fails() {
        assert!(BridgeMessage::from_envelope(1, b"nope").is_err());
    }
}
