//! Events published by a domain for subscribers.

use serde::{Deserialize, Serialize};
use tidal_bridge::{InboundReceipt, OutboundMessage};
use tidal_ledger::LedgerEvent;
use tidal_rate::RateChanged;
use tidal_types::{DeliveryId, DomainId};

/// Domain-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeEvent {
    /// A committed ledger change.
    Ledger(LedgerEvent),
    /// The owner lowered the domain rate.
    RateChanged(RateChanged),
    /// A sender was debited; the message is ready for the transport.
    OutboundDebited(OutboundMessage),
    /// An inbound delivery was credited.
    InboundCredited(InboundReceipt),
    /// An inbound delivery was refused. Nothing was applied.
    DeliveryRejected {
        delivery_id: DeliveryId,
        source_domain: DomainId,
        reason: String,
    },
}

/// Synchronous fan-out event bus for domain events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling the domain.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&NodeEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&NodeEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &NodeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
