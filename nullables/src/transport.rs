//! Nullable transport — an in-memory message queue between two adapters.
//!
//! Carries `OutboundMessage`s to the destination side as `InboundDelivery`
//! envelopes. Tests can redeliver and reorder to exercise the adapter's
//! duplicate guard and ordering independence.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tidal_bridge::{InboundDelivery, OutboundMessage};
use tidal_types::{Address, DeliveryId, DomainId};

/// A test transport that queues envelopes instead of sending them.
pub struct NullTransport {
    /// Caller identity stamped on every delivery.
    router: Address,
    next_id: Cell<u64>,
    /// Envelopes accepted but not yet delivered.
    in_flight: RefCell<VecDeque<InboundDelivery>>,
    /// Every envelope handed out, including redeliveries.
    delivered: RefCell<Vec<InboundDelivery>>,
}

impl NullTransport {
    pub fn new(router: Address) -> Self {
        Self {
            router,
            next_id: Cell::new(1),
            in_flight: RefCell::new(VecDeque::new()),
            delivered: RefCell::new(Vec::new()),
        }
    }

    pub fn router(&self) -> &Address {
        &self.router
    }

    /// Accept a message emitted by `source_adapter` on `source_domain`.
    pub fn send(
        &self,
        source_domain: DomainId,
        source_adapter: &Address,
        message: &OutboundMessage,
    ) -> DeliveryId {
        let seq = self.next_id.get();
        self.next_id.set(seq + 1);
        let mut id = [0u8; 32];
        id[..4].copy_from_slice(&source_domain.as_u32().to_be_bytes());
        id[24..].copy_from_slice(&seq.to_be_bytes());
        let delivery_id = DeliveryId::new(id);

        self.in_flight.borrow_mut().push_back(InboundDelivery {
            caller: self.router.clone(),
            source_domain,
            source_adapter: source_adapter.clone(),
            delivery_id,
            receiver: message.receiver.clone(),
            amount: message.amount,
            payload: message.payload.to_vec(),
        });
        delivery_id
    }

    /// Enqueue a hand-built envelope (forged or corrupted ones included).
    pub fn inject(&self, delivery: InboundDelivery) {
        self.in_flight.borrow_mut().push_back(delivery);
    }

    /// Hand out the oldest pending envelope.
    pub fn deliver_next(&self) -> Option<InboundDelivery> {
        let next = self.in_flight.borrow_mut().pop_front()?;
        self.delivered.borrow_mut().push(next.clone());
        Some(next)
    }

    /// Hand out the most recently delivered envelope again.
    pub fn redeliver_last(&self) -> Option<InboundDelivery> {
        let last = self.delivered.borrow().last().cloned()?;
        self.delivered.borrow_mut().push(last.clone());
        Some(last)
    }

    /// Reverse the order of pending envelopes.
    pub fn reverse_pending(&self) {
        self.in_flight.borrow_mut().make_contiguous().reverse();
    }

    pub fn pending(&self) -> usize {
        self.in_flight.borrow().len()
    }

    /// All envelopes handed out so far (for assertions).
    pub fn delivered(&self) -> Vec<InboundDelivery> {
        self.delivered.borrow().clone()
    }

    /// Clear all state.
    pub fn reset(&self) {
        self.in_flight.borrow_mut().clear();
        self.delivered.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidal_bridge::{encode_rate, TransferState};

    fn message(amount: u128) -> OutboundMessage {
        OutboundMessage {
            remote_domain: DomainId::new(2),
            destination_token: Address::new("tdl_token2"),
            receiver: Address::new("tdl_bob"),
            amount,
            payload: encode_rate(7),
            state: TransferState::Debited,
        }
    }

    #[test]
    fn deliveries_get_distinct_ids_in_fifo_order() {
        let transport = NullTransport::new(Address::new("tdl_router"));
        let adapter = Address::new("tdl_adapter1");
        let first = transport.send(DomainId::new(1), &adapter, &message(1));
        let second = transport.send(DomainId::new(1), &adapter, &message(2));
        assert_ne!(first, second);
        assert_eq!(transport.pending(), 2);

        let d = transport.deliver_next().unwrap();
        assert_eq!(d.delivery_id, first);
        assert_eq!(d.amount, 1);
        assert_eq!(d.caller, Address::new("tdl_router"));
        assert_eq!(d.payload, encode_rate(7).to_vec());
    }

    #[test]
    fn redelivery_repeats_the_same_envelope() {
        let transport = NullTransport::new(Address::new("tdl_router"));
        transport.send(DomainId::new(1), &Address::new("tdl_a"), &message(5));
        let first = transport.deliver_next().unwrap();
        let again = transport.redeliver_last().unwrap();
        assert_eq!(first, again);
        assert_eq!(transport.delivered().len(), 2);
    }

    #[test]
    fn reverse_pending_reorders() {
        let transport = NullTransport::new(Address::new("tdl_router"));
        let adapter = Address::new("tdl_a");
        transport.send(DomainId::new(1), &adapter, &message(1));
        transport.send(DomainId::new(1), &adapter, &message(2));
        transport.reverse_pending();
        assert_eq!(transport.deliver_next().unwrap().amount, 2);
        assert_eq!(transport.deliver_next().unwrap().amount, 1);
        assert!(transport.deliver_next().is_none());
        assert!(transport.redeliver_last().is_some());
        transport.reset();
        assert!(transport.redeliver_last().is_none());
    }
}
