//! Nullable validator — scripted accept/reject decisions.

use std::collections::VecDeque;

use tidal_bridge::{
    BridgeError, InboundDelivery, OutboundRequest, RouteValidator, RoutingTable,
    TransferValidator,
};

/// Validator whose next decisions can be scripted.
///
/// Queued rejections are consumed one per call. With an empty script it
/// falls back to [`RouteValidator`], so inbound trust is still enforced.
#[derive(Debug, Default)]
pub struct NullValidator {
    inner: RouteValidator,
    outbound_script: VecDeque<String>,
    inbound_script: VecDeque<String>,
    outbound_calls: usize,
    inbound_calls: usize,
}

impl NullValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next outbound request with `reason`.
    pub fn reject_next_outbound(&mut self, reason: impl Into<String>) {
        self.outbound_script.push_back(reason.into());
    }

    /// Reject the next inbound delivery with `reason`.
    pub fn reject_next_inbound(&mut self, reason: impl Into<String>) {
        self.inbound_script.push_back(reason.into());
    }

    pub fn outbound_calls(&self) -> usize {
        self.outbound_calls
    }

    pub fn inbound_calls(&self) -> usize {
        self.inbound_calls
    }
}

impl TransferValidator for NullValidator {
    fn validate_outbound(
        &mut self,
        request: &OutboundRequest,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        self.outbound_calls += 1;
        match self.outbound_script.pop_front() {
            Some(reason) => Err(BridgeError::Rejected(reason)),
            None => self.inner.validate_outbound(request, routes),
        }
    }

    fn validate_inbound(
        &mut self,
        delivery: &InboundDelivery,
        routes: &RoutingTable,
    ) -> Result<(), BridgeError> {
        self.inbound_calls += 1;
        match self.inbound_script.pop_front() {
            Some(reason) => Err(BridgeError::Rejected(reason)),
            None => self.inner.validate_inbound(delivery, routes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidal_types::{Address, DomainId};

    fn request() -> OutboundRequest {
        OutboundRequest {
            caller: Address::new("tdl_router"),
            sender: Address::new("tdl_alice"),
            receiver: Address::new("tdl_bob"),
            amount: 1,
            remote_domain: DomainId::new(2),
        }
    }

    #[test]
    fn scripted_rejection_is_consumed_once() {
        let mut v = NullValidator::new();
        v.reject_next_outbound("rate limited");
        let routes = RoutingTable::new();
        assert_eq!(
            v.validate_outbound(&request(), &routes),
            Err(BridgeError::Rejected("rate limited".into()))
        );
        assert!(v.validate_outbound(&request(), &routes).is_ok());
        assert_eq!(v.outbound_calls(), 2);
    }
}
