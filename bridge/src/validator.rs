//! Seam to the external validation collaborator.
//!
//! Authentication of remote senders, allowlists and rate limits live in the
//! transport layer. The adapter only asks a [`TransferValidator`] before it
//! touches the ledger; a rejection aborts the call with nothing applied.

use std::collections::BTreeSet;

use tidal_types::Address;

use crate::error::BridgeError;
use crate::message::{InboundDelivery, OutboundRequest};
use crate::routing::RoutingTable;

pub trait TransferValidator {
    /// Authorization, allowlist and rate-limit checks for an outbound transfer.
    fn validate_outbound(
        &mut self,
        request: &OutboundRequest,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError>;

    /// Verify that `delivery` genuinely comes from the paired adapter.
    fn validate_inbound(
        &mut self,
        delivery: &InboundDelivery,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError>;
}

impl<V: TransferValidator + ?Sized> TransferValidator for Box<V> {
    fn validate_outbound(
        &mut self,
        request: &OutboundRequest,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        (**self).validate_outbound(request, routes)
    }

    fn validate_inbound(
        &mut self,
        delivery: &InboundDelivery,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        (**self).validate_inbound(delivery, routes)
    }
}

/// Validator backed by the routing table alone.
///
/// Inbound deliveries must name the configured remote adapter for their
/// source domain. Outbound requests may optionally be restricted to an
/// allowlist of senders.
#[derive(Clone, Debug, Default)]
pub struct RouteValidator {
    sender_allowlist: Option<BTreeSet<Address>>,
}

impl RouteValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender_allowlist(mut self, senders: impl IntoIterator<Item = Address>) -> Self {
        self.sender_allowlist = Some(senders.into_iter().collect());
        self
    }
}

impl TransferValidator for RouteValidator {
    fn validate_outbound(
        &mut self,
        request: &OutboundRequest,
        _routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        match &self.sender_allowlist {
            Some(allowed) if !allowed.contains(&request.sender) => {
                Err(BridgeError::SenderNotAllowed {
                    sender: request.sender.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn validate_inbound(
        &mut self,
        delivery: &InboundDelivery,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        if routes.is_trusted(delivery.source_domain, &delivery.source_adapter) {
            Ok(())
        } else {
            Err(BridgeError::UntrustedSource {
                domain: delivery.source_domain,
                adapter: delivery.source_adapter.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RemoteRoute, RoutingTable};
    use tidal_types::{DeliveryId, DomainId};

    fn routes() -> RoutingTable {
        RoutingTable::new().with_route(
            DomainId::new(2),
            RemoteRoute {
                remote_adapter: Address::new("tdl_adapter2"),
                remote_token: Address::new("tdl_token2"),
            },
        )
    }

    fn delivery(adapter: &str) -> InboundDelivery {
        InboundDelivery {
            caller: Address::new("tdl_router"),
            source_domain: DomainId::new(2),
            source_adapter: Address::new(format!("tdl_{adapter}")),
            delivery_id: DeliveryId::new([1u8; 32]),
            receiver: Address::new("tdl_bob"),
            amount: 10,
            payload: vec![0u8; 32],
        }
    }

    fn request(sender: &str) -> OutboundRequest {
        OutboundRequest {
            caller: Address::new("tdl_router"),
            sender: Address::new(format!("tdl_{sender}")),
            receiver: Address::new("tdl_bob"),
            amount: 10,
            remote_domain: DomainId::new(2),
        }
    }

    #[test]
    fn inbound_from_paired_adapter_is_accepted() {
        let mut v = RouteValidator::new();
        assert!(v.validate_inbound(&delivery("adapter2"), &routes()).is_ok());
    }

    #[test]
    fn inbound_from_impostor_is_rejected() {
        let mut v = RouteValidator::new();
        assert!(matches!(
            v.validate_inbound(&delivery("impostor"), &routes()),
            Err(BridgeError::UntrustedSource { .. })
        ));
    }

    #[test]
    fn allowlist_gates_outbound_senders() {
        let mut open = RouteValidator::new();
        assert!(open.validate_outbound(&request("anyone"), &routes()).is_ok());

        let mut gated = RouteValidator::new().with_sender_allowlist([Address::new("tdl_alice")]);
        assert!(gated.validate_outbound(&request("alice"), &routes()).is_ok());
        assert_eq!(
            gated.validate_outbound(&request("eve"), &routes()),
            Err(BridgeError::SenderNotAllowed {
                sender: Address::new("tdl_eve")
            })
        );
    }
}
