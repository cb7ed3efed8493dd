//! One running domain — wires the rate registry, ledger and bridge adapter
//! together behind a clock and an event bus.

use std::path::{Path, PathBuf};

use tidal_bridge::{
    BridgeAdapter, InboundDelivery, InboundReceipt, OutboundMessage,
    OutboundRequest, RouteValidator, RoutingTable, TransferValidator,
};
use tidal_ledger::{AccessPolicy, GrantOutcome, Ledger};
use tidal_rate::{RateChanged, RateRegistry};
use tidal_types::{Address, Clock, DomainId, Timestamp};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::event::{EventBus, NodeEvent};
use crate::snapshot::DomainSnapshot;
use crate::spans;

/// A running domain.
///
/// All mutation goes through `&mut self`; the domain is driven by one
/// caller at a time and never blocks.
pub struct DomainNode<C, V> {
    domain_id: DomainId,
    registry: RateRegistry,
    ledger: Ledger,
    adapter: BridgeAdapter<V>,
    clock: C,
    events: EventBus,
    snapshot_path: Option<PathBuf>,
}

impl<C: Clock> DomainNode<C, RouteValidator> {
    /// Build a domain from config with the routing-table validator.
    pub fn from_config(config: &NodeConfig, clock: C) -> Self {
        let validator = match &config.sender_allowlist {
            Some(senders) => RouteValidator::new().with_sender_allowlist(senders.iter().cloned()),
            None => RouteValidator::new(),
        };
        Self::with_validator(config, clock, validator)
    }
}

impl<C: Clock, V: TransferValidator> DomainNode<C, V> {
    /// Build a domain from config with a caller-supplied validator.
    pub fn with_validator(config: &NodeConfig, clock: C, validator: V) -> Self {
        let ledger_policy = AccessPolicy::new(config.owner.clone()).with_privileged(
            config
                .custodians
                .iter()
                .cloned()
                .chain(std::iter::once(config.adapter_identity.clone())),
        );
        let adapter_policy =
            AccessPolicy::new(config.owner.clone()).with_privileged(config.routers.iter().cloned());
        let adapter = BridgeAdapter::new(
            config.adapter_identity.clone(),
            adapter_policy,
            RoutingTable::from_entries(config.routes.iter().cloned()),
            validator,
            config.adapter,
        );
        let registry = RateRegistry::new(
            config.owner.clone(),
            u128::from(config.initial_rate),
            clock.now(),
        );
        tracing::info!(
            domain = %config.domain_id,
            rate = config.initial_rate,
            routes = config.routes.len(),
            "domain started"
        );
        Self {
            domain_id: config.domain_id,
            registry,
            ledger: Ledger::new(ledger_policy),
            adapter,
            clock,
            events: EventBus::new(),
            snapshot_path: config.snapshot_path.clone(),
        }
    }

    pub fn domain_id(&self) -> DomainId {
        self.domain_id
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn adapter(&self) -> &BridgeAdapter<V> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut BridgeAdapter<V> {
        &mut self.adapter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&NodeEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Custody ────────────────────────────────────────────────────────

    /// Credit `amount` to `account` at the domain's current rate.
    pub fn deposit(
        &mut self,
        custodian: &Address,
        account: &Address,
        amount: u128,
    ) -> Result<GrantOutcome, NodeError> {
        let _span = spans::custody_span("deposit", self.domain_id, account).entered();
        let now = self.clock.now();
        let rate = self.registry.current_rate();
        let outcome = self.ledger.grant(custodian, account, amount, rate, now)?;
        self.publish_ledger_events();
        Ok(outcome)
    }

    /// Debit `amount` (or `WITHDRAW_ALL`) from `account`.
    pub fn redeem(
        &mut self,
        custodian: &Address,
        account: &Address,
        amount: u128,
    ) -> Result<u128, NodeError> {
        let _span = spans::custody_span("redeem", self.domain_id, account).entered();
        let now = self.clock.now();
        let withdrawn = self.ledger.withdraw(custodian, account, amount, now)?;
        self.publish_ledger_events();
        Ok(withdrawn)
    }

    /// Add `who` to the ledger's privileged set. Owner only.
    pub fn admit_custodian(&mut self, caller: &Address, who: Address) -> Result<bool, NodeError> {
        let added = self.ledger.policy_mut().admit(caller, who.clone())?;
        tracing::info!(domain = %self.domain_id, custodian = %who, added, "custodian admitted");
        Ok(added)
    }

    /// Remove `who` from the ledger's privileged set. Owner only.
    pub fn revoke_custodian(&mut self, caller: &Address, who: &Address) -> Result<bool, NodeError> {
        let removed = self.ledger.policy_mut().revoke(caller, who)?;
        tracing::info!(domain = %self.domain_id, custodian = %who, removed, "custodian revoked");
        Ok(removed)
    }

    // ── Rate ───────────────────────────────────────────────────────────

    pub fn set_rate(&mut self, caller: &Address, new_rate: u128) -> Result<RateChanged, NodeError> {
        let _span = spans::rate_change_span(self.domain_id).entered();
        let changed = self.registry.set_rate(caller, new_rate, self.clock.now())?;
        self.events.emit(&NodeEvent::RateChanged(changed.clone()));
        Ok(changed)
    }

    // ── Holders ────────────────────────────────────────────────────────

    pub fn balance_of(&self, account: &Address) -> Result<u128, NodeError> {
        Ok(self.ledger.balance_of(account, self.clock.now())?)
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), NodeError> {
        let now = self.clock.now();
        self.ledger.transfer(from, to, amount, now)?;
        self.publish_ledger_events();
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.ledger.approve(owner, spender, amount);
        self.publish_ledger_events();
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), NodeError> {
        let now = self.clock.now();
        self.ledger.transfer_from(spender, from, to, amount, now)?;
        self.publish_ledger_events();
        Ok(())
    }

    /// Fold `account`'s accrued interest into its stored principal.
    pub fn settle(&mut self, account: &Address) -> Result<u128, NodeError> {
        let now = self.clock.now();
        let owed = self.ledger.settle(account, now)?;
        self.publish_ledger_events();
        Ok(owed)
    }

    // ── Bridge ─────────────────────────────────────────────────────────

    /// Outbound half: debit the sender and return the message to transport.
    pub fn send(&mut self, request: &OutboundRequest) -> Result<OutboundMessage, NodeError> {
        let _span =
            spans::outbound_span(self.domain_id, &request.sender, request.remote_domain).entered();
        let now = self.clock.now();
        let message = self.adapter.lock_or_burn(&mut self.ledger, request, now)?;
        self.publish_ledger_events();
        self.events.emit(&NodeEvent::OutboundDebited(message.clone()));
        Ok(message)
    }

    /// Inbound half: credit a delivery from a paired adapter.
    pub fn receive(&mut self, delivery: &InboundDelivery) -> Result<InboundReceipt, NodeError> {
        let _span = spans::inbound_span(
            self.domain_id,
            &delivery.delivery_id,
            delivery.source_domain,
        )
        .entered();
        let now = self.clock.now();
        match self.adapter.release_or_mint(&mut self.ledger, delivery, now) {
            Ok(receipt) => {
                self.publish_ledger_events();
                self.events.emit(&NodeEvent::InboundCredited(receipt.clone()));
                Ok(receipt)
            }
            Err(e) => {
                self.events.emit(&NodeEvent::DeliveryRejected {
                    delivery_id: delivery.delivery_id,
                    source_domain: delivery.source_domain,
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    /// Capture the ledger and the duplicate window together.
    pub fn snapshot(&self) -> DomainSnapshot {
        DomainSnapshot::new(
            self.domain_id,
            self.ledger.snapshot(self.clock.now()),
            self.adapter.seen_deliveries(),
        )
    }

    /// Write a domain snapshot to `path`.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<DomainSnapshot, NodeError> {
        let snapshot = self.snapshot();
        std::fs::write(path.as_ref(), snapshot.to_bytes()?)?;
        tracing::info!(
            path = %path.as_ref().display(),
            hash = %snapshot.hash_hex(),
            deliveries = snapshot.deliveries.len(),
            "snapshot written"
        );
        Ok(snapshot)
    }

    /// Replace the ledger and the duplicate window with the snapshot stored
    /// at `path`.
    ///
    /// The snapshot is verified before anything is replaced. The live
    /// access policy is kept, including custodians admitted since boot.
    pub fn load_snapshot(&mut self, path: impl AsRef<Path>) -> Result<(), NodeError> {
        let bytes = std::fs::read(path.as_ref())?;
        let snapshot = DomainSnapshot::from_bytes(&bytes)?;
        snapshot.check()?;
        if snapshot.domain_id != self.domain_id {
            return Err(NodeError::Snapshot(format!(
                "snapshot belongs to domain {}, not {}",
                snapshot.domain_id, self.domain_id
            )));
        }
        let ledger = Ledger::restore(self.ledger.policy().clone(), &snapshot.ledger)?;
        self.ledger = ledger;
        self.adapter.restore_seen(snapshot.deliveries.iter().copied());
        tracing::info!(
            path = %path.as_ref().display(),
            hash = %snapshot.hash_hex(),
            "snapshot loaded"
        );
        Ok(())
    }

    /// Write a snapshot to the configured `snapshot_path`.
    pub fn checkpoint(&self) -> Result<DomainSnapshot, NodeError> {
        let path = self.configured_snapshot_path()?;
        self.save_snapshot(path)
    }

    /// Load the snapshot at the configured `snapshot_path`.
    ///
    /// Returns `false` without touching state when no snapshot has been
    /// written there yet.
    pub fn recover(&mut self) -> Result<bool, NodeError> {
        let path = self.configured_snapshot_path()?.to_path_buf();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no snapshot to recover");
            return Ok(false);
        }
        self.load_snapshot(&path)?;
        Ok(true)
    }

    fn configured_snapshot_path(&self) -> Result<&Path, NodeError> {
        self.snapshot_path
            .as_deref()
            .ok_or_else(|| NodeError::Config("snapshot_path is not set".to_string()))
    }

    fn publish_ledger_events(&mut self) {
        for event in self.ledger.drain_events() {
            tracing::trace!(domain = %self.domain_id, kind = event.kind(), "ledger event");
            self.events.emit(&NodeEvent::Ledger(event));
        }
    }
}
