//! Pre-built [`tracing::Span`] constructors for domain operations.
//!
//! Consistent span names and fields make it easy to correlate the two
//! halves of a cross-domain transfer in collected logs.

use tidal_types::{Address, DeliveryId, DomainId};
use tracing::{info_span, Span};

/// Span covering one custody deposit or redemption.
pub fn custody_span(op: &'static str, domain: DomainId, account: &Address) -> Span {
    info_span!("custody", op, domain = %domain, account = %account)
}

/// Span covering the outbound half of a bridge transfer.
pub fn outbound_span(domain: DomainId, sender: &Address, remote: DomainId) -> Span {
    info_span!("bridge_outbound", domain = %domain, sender = %sender, remote = %remote)
}

/// Span covering the inbound half of a bridge transfer.
pub fn inbound_span(domain: DomainId, delivery: &DeliveryId, source: DomainId) -> Span {
    info_span!("bridge_inbound", domain = %domain, delivery = %delivery, source = %source)
}

pub fn rate_change_span(domain: DomainId) -> Span {
    info_span!("rate_change", domain = %domain)
}
