//! The adapter between one domain's ledger and the cross-domain transport.

use serde::{Deserialize, Serialize};
use tidal_ledger::{AccessPolicy, Ledger, RateAssignment};
use tidal_types::{Address, DeliveryId, DomainId, Timestamp, WITHDRAW_ALL};

use crate::dedupe::{RecentDeliveries, DEFAULT_DEDUPE_CAPACITY};
use crate::error::BridgeError;
use crate::message::{BridgeMessage, InboundDelivery, OutboundRequest};
use crate::payload::PAYLOAD_LEN;
use crate::routing::RoutingTable;
use crate::validator::TransferValidator;

/// Where a transfer stands. Only forward moves exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Initiated,
    Debited,
    Credited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// How an inbound credit treats the recipient's existing rate.
    #[serde(default)]
    pub inbound_rate_policy: RateAssignment,
    /// Refuse a second credit for a delivery id already seen.
    #[serde(default = "default_dedupe")]
    pub dedupe_deliveries: bool,
    /// How many credited delivery ids the duplicate guard remembers.
    #[serde(default = "default_dedupe_capacity")]
    pub dedupe_capacity: usize,
}

fn default_dedupe() -> bool {
    true
}

fn default_dedupe_capacity() -> usize {
    DEFAULT_DEDUPE_CAPACITY
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            inbound_rate_policy: RateAssignment::default(),
            dedupe_deliveries: default_dedupe(),
            dedupe_capacity: default_dedupe_capacity(),
        }
    }
}

/// What the outbound half hands to the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub remote_domain: DomainId,
    pub destination_token: Address,
    pub receiver: Address,
    /// Units actually debited (resolved when `WITHDRAW_ALL` was requested).
    pub amount: u128,
    pub payload: [u8; PAYLOAD_LEN],
    pub state: TransferState,
}

/// Result of a successful inbound credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundReceipt {
    pub delivery_id: DeliveryId,
    pub source_domain: DomainId,
    pub receiver: Address,
    pub amount: u128,
    /// The rate carried by the message.
    pub carried_rate: u128,
    /// The receiver's locked rate after crediting.
    pub applied_rate: u128,
    pub state: TransferState,
}

/// Bridge adapter for one domain.
///
/// `identity` is the address the adapter uses as custodian on the ledger,
/// so it must be in the ledger's privileged set. `policy` names who may
/// drive the adapter itself.
pub struct BridgeAdapter<V> {
    identity: Address,
    policy: AccessPolicy,
    routes: RoutingTable,
    validator: V,
    config: AdapterConfig,
    seen: RecentDeliveries,
}

impl<V: TransferValidator> BridgeAdapter<V> {
    pub fn new(
        identity: Address,
        policy: AccessPolicy,
        routes: RoutingTable,
        validator: V,
        config: AdapterConfig,
    ) -> Self {
        Self {
            identity,
            policy,
            routes,
            validator,
            config,
            seen: RecentDeliveries::new(config.dedupe_capacity),
        }
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn has_seen(&self, id: &DeliveryId) -> bool {
        self.seen.contains(id)
    }

    /// Credited delivery ids still inside the duplicate window, oldest first.
    pub fn seen_deliveries(&self) -> Vec<DeliveryId> {
        self.seen.iter().copied().collect()
    }

    /// Replace the duplicate window with `ids`, listed oldest first.
    ///
    /// Used when the ledger is restored, so the window matches the credits
    /// the restored ledger actually holds.
    pub fn restore_seen(&mut self, ids: impl IntoIterator<Item = DeliveryId>) {
        self.seen = RecentDeliveries::from_ids(self.config.dedupe_capacity, ids);
        tracing::debug!(remembered = self.seen.len(), "duplicate window restored");
    }

    /// Debit `request.sender` and produce the message for the remote domain.
    ///
    /// Every check runs before the ledger is touched. On success the sender
    /// has been debited and the transfer is `Debited`; there is no undo.
    pub fn lock_or_burn(
        &mut self,
        ledger: &mut Ledger,
        request: &OutboundRequest,
        now: Timestamp,
    ) -> Result<OutboundMessage, BridgeError> {
        self.authorize(&request.caller)?;
        if request.amount == 0
            || (request.amount == WITHDRAW_ALL && ledger.balance_of(&request.sender, now)? == 0)
        {
            return Err(BridgeError::ZeroAmount);
        }
        self.validator.validate_outbound(request, &self.routes)?;
        let route = self.routes.resolve(request.remote_domain)?;
        let destination_token = route.remote_token.clone();

        let rate = ledger.locked_rate(&request.sender);
        tracing::debug!(
            sender = %request.sender,
            remote = %request.remote_domain,
            state = ?TransferState::Initiated,
            "outbound transfer"
        );
        let amount = ledger.withdraw(&self.identity, &request.sender, request.amount, now)?;

        let message = BridgeMessage { amount, rate };
        tracing::info!(
            sender = %request.sender,
            receiver = %request.receiver,
            remote = %request.remote_domain,
            amount,
            rate,
            state = ?TransferState::Debited,
            "outbound transfer debited"
        );
        Ok(OutboundMessage {
            remote_domain: request.remote_domain,
            destination_token,
            receiver: request.receiver.clone(),
            amount,
            payload: message.payload(),
            state: TransferState::Debited,
        })
    }

    /// Credit an inbound delivery to its receiver at the carried rate.
    pub fn release_or_mint(
        &mut self,
        ledger: &mut Ledger,
        delivery: &InboundDelivery,
        now: Timestamp,
    ) -> Result<InboundReceipt, BridgeError> {
        self.authorize(&delivery.caller)?;
        if let Err(e) = self.validator.validate_inbound(delivery, &self.routes) {
            tracing::warn!(
                source = %delivery.source_domain,
                adapter = %delivery.source_adapter,
                error = %e,
                "inbound delivery rejected"
            );
            return Err(e);
        }
        if self.config.dedupe_deliveries && self.seen.contains(&delivery.delivery_id) {
            tracing::warn!(delivery = %delivery.delivery_id, "duplicate delivery dropped");
            return Err(BridgeError::DuplicateDelivery(delivery.delivery_id));
        }
        let message = BridgeMessage::from_envelope(delivery.amount, &delivery.payload)?;
        if message.amount == 0 {
            return Err(BridgeError::ZeroAmount);
        }

        let outcome = ledger.grant_with(
            &self.identity,
            &delivery.receiver,
            message.amount,
            message.rate,
            self.config.inbound_rate_policy,
            now,
        )?;
        if self.config.dedupe_deliveries {
            self.seen.insert(delivery.delivery_id);
        }

        tracing::info!(
            delivery = %delivery.delivery_id,
            source = %delivery.source_domain,
            receiver = %delivery.receiver,
            amount = message.amount,
            rate = message.rate,
            applied_rate = outcome.rate,
            state = ?TransferState::Credited,
            "inbound transfer credited"
        );
        Ok(InboundReceipt {
            delivery_id: delivery.delivery_id,
            source_domain: delivery.source_domain,
            receiver: delivery.receiver.clone(),
            amount: message.amount,
            carried_rate: message.rate,
            applied_rate: outcome.rate,
            state: TransferState::Credited,
        })
    }

    fn authorize(&self, caller: &Address) -> Result<(), BridgeError> {
        if self.policy.is_privileged(caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, "adapter call refused");
            Err(BridgeError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }
}
