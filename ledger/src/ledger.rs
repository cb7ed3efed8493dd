//! The per-domain ledger.
//!
//! Every public mutation follows the same shape: load working copies of the
//! touched accounts, settle them, validate, compute the new totals with
//! checked arithmetic, and only then write everything back. A call that
//! returns `Err` has not changed anything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tidal_types::{Address, Timestamp, WITHDRAW_ALL};

use crate::account::Account;
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::policy::AccessPolicy;

/// When a grant may replace the recipient's locked rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateAssignment {
    /// Only when the recipient's settled balance is zero.
    #[default]
    ZeroBalanceOnly,
    /// Always; an existing holder is re-rated on every grant.
    Overwrite,
}

/// Running supply bookkeeping.
///
/// Interest folded in by settlement counts as a grant, so after any call
/// `Σ principal == granted + interest_settled − withdrawn`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyTotals {
    pub granted: u128,
    pub withdrawn: u128,
    pub interest_settled: u128,
}

impl SupplyTotals {
    /// The principal sum these totals imply.
    pub fn expected_principal(&self) -> Option<u128> {
        self.granted
            .checked_add(self.interest_settled)?
            .checked_sub(self.withdrawn)
    }
}

/// Result of a successful grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrantOutcome {
    /// Interest settled on the recipient before crediting.
    pub settled: u128,
    /// The recipient's locked rate after the grant.
    pub rate: u128,
    /// Whether the grant (re)assigned the recipient's rate.
    pub rate_locked: bool,
}

/// Accounts of one domain, with lazy interest accrual.
#[derive(Clone, Debug)]
pub struct Ledger {
    pub(crate) policy: AccessPolicy,
    pub(crate) accounts: HashMap<Address, Account>,
    pub(crate) allowances: HashMap<Address, HashMap<Address, u128>>,
    pub(crate) totals: SupplyTotals,
    pub(crate) total_principal: u128,
    pub(crate) outbox: Vec<LedgerEvent>,
}

impl Ledger {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            accounts: HashMap::new(),
            allowances: HashMap::new(),
            totals: SupplyTotals::default(),
            total_principal: 0,
            outbox: Vec::new(),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Mutable access for owner-gated administration (`admit`/`revoke`).
    pub fn policy_mut(&mut self) -> &mut AccessPolicy {
        &mut self.policy
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// Computed balance: principal plus interest accrued up to `now`.
    pub fn balance_of(&self, account: &Address, now: Timestamp) -> Result<u128, LedgerError> {
        match self.accounts.get(account) {
            Some(acct) => acct.balance_at(now),
            None => Ok(0),
        }
    }

    /// Stored principal, without unsettled interest.
    pub fn raw_principal(&self, account: &Address) -> u128 {
        self.accounts.get(account).map_or(0, |a| a.principal)
    }

    /// The account's locked rate (0 for an account never credited).
    pub fn locked_rate(&self, account: &Address) -> u128 {
        self.accounts.get(account).map_or(0, |a| a.rate)
    }

    pub fn account(&self, account: &Address) -> Option<&Account> {
        self.accounts.get(account)
    }

    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Σ stored principal.
    pub fn total_supply(&self) -> u128 {
        self.total_principal
    }

    /// Σ computed balances at `now`.
    pub fn computed_total_supply(&self, now: Timestamp) -> Result<u128, LedgerError> {
        self.accounts.values().try_fold(0u128, |sum, acct| {
            sum.checked_add(acct.balance_at(now)?)
                .ok_or(LedgerError::Overflow)
        })
    }

    pub fn supply_totals(&self) -> SupplyTotals {
        self.totals
    }

    /// Verify the supply invariant against the stored accounts.
    pub fn check_supply(&self) -> bool {
        let summed = self
            .accounts
            .values()
            .try_fold(0u128, |sum, a| sum.checked_add(a.principal));
        summed == Some(self.total_principal)
            && self.totals.expected_principal() == Some(self.total_principal)
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// Credit `amount` to `account`, locking `rate` if its balance is zero.
    pub fn grant(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        rate: u128,
        now: Timestamp,
    ) -> Result<GrantOutcome, LedgerError> {
        self.grant_with(caller, account, amount, rate, RateAssignment::ZeroBalanceOnly, now)
    }

    /// Credit `amount` to `account` and unconditionally adopt `rate`.
    pub fn grant_overwriting_rate(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        rate: u128,
        now: Timestamp,
    ) -> Result<GrantOutcome, LedgerError> {
        self.grant_with(caller, account, amount, rate, RateAssignment::Overwrite, now)
    }

    /// Credit `amount` to `account` under an explicit rate-assignment rule.
    pub fn grant_with(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        rate: u128,
        assignment: RateAssignment,
        now: Timestamp,
    ) -> Result<GrantOutcome, LedgerError> {
        self.policy.require_privileged(caller)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let mut events = Vec::new();
        let (mut acct, owed) = self.settled(account, now, &mut events)?;

        let relock = match assignment {
            RateAssignment::ZeroBalanceOnly => acct.is_empty(),
            RateAssignment::Overwrite => true,
        };
        if relock {
            acct.rate = rate;
            events.push(LedgerEvent::RateLocked {
                account: account.clone(),
                rate,
            });
        }
        acct.mark_settled(now);
        acct.principal = acct
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let totals = SupplyTotals {
            granted: self
                .totals
                .granted
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?,
            interest_settled: self
                .totals
                .interest_settled
                .checked_add(owed)
                .ok_or(LedgerError::Overflow)?,
            ..self.totals
        };
        let total_principal = self
            .total_principal
            .checked_add(owed)
            .and_then(|t| t.checked_add(amount))
            .ok_or(LedgerError::Overflow)?;

        let outcome = GrantOutcome {
            settled: owed,
            rate: acct.rate,
            rate_locked: relock,
        };
        events.push(LedgerEvent::Granted {
            account: account.clone(),
            amount,
            by: caller.clone(),
        });
        self.accounts.insert(account.clone(), acct);
        self.totals = totals;
        self.total_principal = total_principal;
        self.outbox.extend(events);
        tracing::debug!(%account, amount, rate = outcome.rate, rate_locked = relock, "granted");
        Ok(outcome)
    }

    /// Debit `amount` from `account` and return what was debited.
    ///
    /// [`WITHDRAW_ALL`] debits the entire settled balance, which may be 0.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.policy.require_privileged(caller)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let mut events = Vec::new();
        let (mut acct, owed) = self.settled(account, now, &mut events)?;

        let available = acct.principal;
        let amount = if amount == WITHDRAW_ALL { available } else { amount };
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        acct.mark_settled(now);
        acct.principal = available - amount;

        let totals = SupplyTotals {
            withdrawn: self
                .totals
                .withdrawn
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?,
            interest_settled: self
                .totals
                .interest_settled
                .checked_add(owed)
                .ok_or(LedgerError::Overflow)?,
            ..self.totals
        };
        let total_principal = self
            .total_principal
            .checked_add(owed)
            .and_then(|t| t.checked_sub(amount))
            .ok_or(LedgerError::Overflow)?;

        events.push(LedgerEvent::Withdrawn {
            account: account.clone(),
            amount,
            by: caller.clone(),
        });
        self.accounts.insert(account.clone(), acct);
        self.totals = totals;
        self.total_principal = total_principal;
        self.outbox.extend(events);
        tracing::debug!(%account, amount, "withdrawn");
        Ok(amount)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// A recipient whose settled balance is zero inherits the sender's
    /// locked rate. The sender's rate never changes.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let mut events = Vec::new();
        let (mut src, src_owed) = self.settled(from, now, &mut events)?;
        if src.principal < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: src.principal,
            });
        }

        if from == to {
            // Nothing moves, but the settlement still lands.
            let total_principal = self
                .total_principal
                .checked_add(src_owed)
                .ok_or(LedgerError::Overflow)?;
            let interest_settled = self
                .totals
                .interest_settled
                .checked_add(src_owed)
                .ok_or(LedgerError::Overflow)?;
            events.push(LedgerEvent::Transferred {
                from: from.clone(),
                to: to.clone(),
                amount,
            });
            self.accounts.insert(from.clone(), src);
            self.totals.interest_settled = interest_settled;
            self.total_principal = total_principal;
            self.outbox.extend(events);
            return Ok(());
        }

        let (mut dst, dst_owed) = self.settled(to, now, &mut events)?;
        if dst.is_empty() && dst.rate != src.rate {
            dst.rate = src.rate;
            events.push(LedgerEvent::RateLocked {
                account: to.clone(),
                rate: src.rate,
            });
        }
        src.mark_settled(now);
        dst.mark_settled(now);
        src.principal -= amount;
        dst.principal = dst
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let owed = src_owed
            .checked_add(dst_owed)
            .ok_or(LedgerError::Overflow)?;
        let total_principal = self
            .total_principal
            .checked_add(owed)
            .ok_or(LedgerError::Overflow)?;
        let interest_settled = self
            .totals
            .interest_settled
            .checked_add(owed)
            .ok_or(LedgerError::Overflow)?;

        events.push(LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        self.accounts.insert(from.clone(), src);
        self.accounts.insert(to.clone(), dst);
        self.totals.interest_settled = interest_settled;
        self.total_principal = total_principal;
        self.outbox.extend(events);
        Ok(())
    }

    /// Let `spender` move up to `amount` of `owner`'s balance.
    ///
    /// [`WITHDRAW_ALL`] is an unlimited allowance.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
        self.outbox.push(LedgerEvent::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
    }

    /// Transfer on `from`'s behalf, consuming `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed != WITHDRAW_ALL && allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(from, to, amount, now)?;
        if allowed != WITHDRAW_ALL {
            self.allowances
                .entry(from.clone())
                .or_default()
                .insert(spender.clone(), allowed - amount);
        }
        Ok(())
    }

    /// Fold `account`'s accrued interest into principal.
    ///
    /// Anyone may call this; it never changes a balance, only where the
    /// balance is stored. Unknown accounts are left absent.
    pub fn settle(&mut self, account: &Address, now: Timestamp) -> Result<u128, LedgerError> {
        if !self.accounts.contains_key(account) {
            return Ok(0);
        }
        let mut events = Vec::new();
        let (acct, owed) = self.settled(account, now, &mut events)?;
        let total_principal = self
            .total_principal
            .checked_add(owed)
            .ok_or(LedgerError::Overflow)?;
        let interest_settled = self
            .totals
            .interest_settled
            .checked_add(owed)
            .ok_or(LedgerError::Overflow)?;
        self.accounts.insert(account.clone(), acct);
        self.totals.interest_settled = interest_settled;
        self.total_principal = total_principal;
        self.outbox.extend(events);
        Ok(owed)
    }

    /// Working copy of `who`, settled to `now`.
    fn settled(
        &self,
        who: &Address,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(Account, u128), LedgerError> {
        let mut acct = self.accounts.get(who).cloned().unwrap_or_default();
        let owed = acct.settle(now)?;
        if owed > 0 {
            tracing::debug!(account = %who, owed, at = %now, "interest settled");
            events.push(LedgerEvent::InterestSettled {
                account: who.clone(),
                amount: owed,
                at: now,
            });
        }
        Ok((acct, owed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u128 = 50_000_000_000;

    fn addr(name: &str) -> Address {
        Address::new(format!("tdl_{name}"))
    }

    fn custody() -> Address {
        addr("custody")
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn make_ledger() -> Ledger {
        Ledger::new(AccessPolicy::new(addr("owner")).with_privileged([custody()]))
    }

    #[test]
    fn grant_then_accrue_scenario() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        assert_eq!(ledger.balance_of(&a, ts(0)).unwrap(), 100_000);

        let b1 = ledger.balance_of(&a, ts(3600)).unwrap();
        let b2 = ledger.balance_of(&a, ts(7200)).unwrap();
        assert!(b1 > 100_000);
        let first = b1 - 100_000;
        let second = b2 - b1;
        assert!(first.abs_diff(second) <= 1, "{first} vs {second}");
    }

    #[test]
    fn grant_then_withdraw_all_scenario() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 42_000, RATE, ts(10)).unwrap();
        let withdrawn = ledger.withdraw(&custody(), &a, WITHDRAW_ALL, ts(10)).unwrap();
        assert_eq!(withdrawn, 42_000);
        assert_eq!(ledger.balance_of(&a, ts(10)).unwrap(), 0);
        assert!(ledger.check_supply());
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn raw_principal_ignores_elapsed_time() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 1_000_000, RATE, ts(0)).unwrap();
        assert_eq!(ledger.raw_principal(&a), 1_000_000);
        assert!(ledger.balance_of(&a, ts(86_400)).unwrap() > 1_000_000);
        assert_eq!(ledger.raw_principal(&a), 1_000_000);
    }

    #[test]
    fn grant_settles_before_crediting() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        let outcome = ledger.grant(&custody(), &a, 1, RATE, ts(3600)).unwrap();
        assert_eq!(outcome.settled, 18);
        assert!(!outcome.rate_locked);
        assert_eq!(ledger.raw_principal(&a), 100_019);
        assert!(ledger.check_supply());
        assert_eq!(ledger.supply_totals().interest_settled, 18);
    }

    #[test]
    fn grant_keeps_locked_rate_on_funded_account() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 500, RATE, ts(0)).unwrap();
        ledger.grant(&custody(), &a, 500, RATE / 2, ts(1)).unwrap();
        assert_eq!(ledger.locked_rate(&a), RATE);
    }

    #[test]
    fn grant_relocks_rate_after_account_drains() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 500, RATE, ts(0)).unwrap();
        ledger.withdraw(&custody(), &a, WITHDRAW_ALL, ts(0)).unwrap();
        let outcome = ledger.grant(&custody(), &a, 500, RATE / 2, ts(0)).unwrap();
        assert!(outcome.rate_locked);
        assert_eq!(ledger.locked_rate(&a), RATE / 2);
    }

    #[test]
    fn grant_overwriting_rate_replaces_funded_rate() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 500, RATE, ts(0)).unwrap();
        let outcome = ledger
            .grant_overwriting_rate(&custody(), &a, 500, RATE / 4, ts(0))
            .unwrap();
        assert!(outcome.rate_locked);
        assert_eq!(ledger.locked_rate(&a), RATE / 4);
        assert_eq!(ledger.raw_principal(&a), 1000);
    }

    #[test]
    fn unauthorized_grant_and_withdraw_are_rejected() {
        let mut ledger = make_ledger();
        let a = addr("a");
        let err = ledger.grant(&a, &a, 1, RATE, ts(0)).unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized { caller: a.clone() });
        assert_eq!(err.class(), tidal_types::ErrorClass::Validation);
        assert!(matches!(
            ledger.withdraw(&a, &a, 1, ts(0)),
            Err(LedgerError::Unauthorized { .. })
        ));
        assert!(ledger.account(&a).is_none());
        assert!(ledger.drain_events().is_empty());
    }

    #[test]
    fn owner_is_not_a_custodian() {
        let mut ledger = make_ledger();
        assert!(ledger
            .grant(&addr("owner"), &addr("a"), 1, RATE, ts(0))
            .is_err());
    }

    #[test]
    fn overdraw_reports_settled_balance() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        let err = ledger.withdraw(&custody(), &a, 200_000, ts(3600)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                needed: 200_000,
                available: 100_018,
            }
        );
        assert_eq!(err.class(), tidal_types::ErrorClass::Accounting);
        // Rejected call must not have settled anything.
        assert_eq!(ledger.raw_principal(&a), 100_000);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut ledger = make_ledger();
        let a = addr("a");
        assert_eq!(
            ledger.grant(&custody(), &a, 0, RATE, ts(0)),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            ledger.withdraw(&custody(), &a, 0, ts(0)),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            ledger.transfer(&a, &addr("b"), 0, ts(0)),
            Err(LedgerError::ZeroAmount)
        );
    }

    #[test]
    fn withdraw_all_on_empty_account_returns_zero() {
        let mut ledger = make_ledger();
        assert_eq!(
            ledger
                .withdraw(&custody(), &addr("ghost"), WITHDRAW_ALL, ts(0))
                .unwrap(),
            0
        );
    }

    #[test]
    fn transfer_to_empty_account_inherits_sender_rate() {
        let mut ledger = make_ledger();
        let (a, b) = (addr("a"), addr("b"));
        ledger.grant(&custody(), &a, 10_000, RATE, ts(0)).unwrap();
        ledger.transfer(&a, &b, 4_000, ts(0)).unwrap();
        assert_eq!(ledger.locked_rate(&b), RATE);
        assert_eq!(ledger.locked_rate(&a), RATE);
        assert_eq!(ledger.raw_principal(&a), 6_000);
        assert_eq!(ledger.raw_principal(&b), 4_000);
        assert!(ledger.check_supply());
    }

    #[test]
    fn transfer_to_funded_account_keeps_recipient_rate() {
        let mut ledger = make_ledger();
        let (a, b) = (addr("a"), addr("b"));
        ledger.grant(&custody(), &a, 10_000, RATE, ts(0)).unwrap();
        ledger.grant(&custody(), &b, 10_000, RATE / 2, ts(0)).unwrap();
        ledger.transfer(&a, &b, 1, ts(0)).unwrap();
        assert_eq!(ledger.locked_rate(&b), RATE / 2);
        assert_eq!(ledger.locked_rate(&a), RATE);
    }

    #[test]
    fn transfer_settles_both_sides() {
        let mut ledger = make_ledger();
        let (a, b) = (addr("a"), addr("b"));
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        ledger.grant(&custody(), &b, 100_000, RATE, ts(0)).unwrap();
        ledger.transfer(&a, &b, 1_000, ts(3600)).unwrap();
        assert_eq!(ledger.raw_principal(&a), 100_018 - 1_000);
        assert_eq!(ledger.raw_principal(&b), 100_018 + 1_000);
        assert_eq!(ledger.supply_totals().interest_settled, 36);
        assert!(ledger.check_supply());
    }

    #[test]
    fn transfer_overdraw_is_rejected_without_mutation() {
        let mut ledger = make_ledger();
        let (a, b) = (addr("a"), addr("b"));
        ledger.grant(&custody(), &a, 10, RATE, ts(0)).unwrap();
        ledger.drain_events();
        assert!(matches!(
            ledger.transfer(&a, &b, 11, ts(0)),
            Err(LedgerError::InsufficientBalance { needed: 11, available: 10 })
        ));
        assert!(ledger.account(&b).is_none());
        assert!(ledger.drain_events().is_empty());
    }

    #[test]
    fn self_transfer_moves_nothing() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        ledger.transfer(&a, &a, 50_000, ts(3600)).unwrap();
        assert_eq!(ledger.raw_principal(&a), 100_018);
        assert!(ledger.check_supply());
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = make_ledger();
        let (a, b, spender) = (addr("a"), addr("b"), addr("spender"));
        ledger.grant(&custody(), &a, 1_000, RATE, ts(0)).unwrap();
        ledger.approve(&a, &spender, 300);

        ledger.transfer_from(&spender, &a, &b, 200, ts(0)).unwrap();
        assert_eq!(ledger.allowance(&a, &spender), 100);
        assert_eq!(ledger.raw_principal(&b), 200);

        let err = ledger.transfer_from(&spender, &a, &b, 101, ts(0)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                needed: 101,
                available: 100
            }
        );
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let mut ledger = make_ledger();
        let (a, b, spender) = (addr("a"), addr("b"), addr("spender"));
        ledger.grant(&custody(), &a, 10, RATE, ts(0)).unwrap();
        ledger.approve(&a, &spender, 100);
        assert!(ledger.transfer_from(&spender, &a, &b, 50, ts(0)).is_err());
        assert_eq!(ledger.allowance(&a, &spender), 100);
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let mut ledger = make_ledger();
        let (a, b, spender) = (addr("a"), addr("b"), addr("spender"));
        ledger.grant(&custody(), &a, 1_000, RATE, ts(0)).unwrap();
        ledger.approve(&a, &spender, WITHDRAW_ALL);
        ledger.transfer_from(&spender, &a, &b, 999, ts(0)).unwrap();
        assert_eq!(ledger.allowance(&a, &spender), WITHDRAW_ALL);
    }

    #[test]
    fn settle_poke_moves_interest_into_principal() {
        let mut ledger = make_ledger();
        let a = addr("a");
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        let before = ledger.balance_of(&a, ts(3600)).unwrap();
        assert_eq!(ledger.settle(&a, ts(3600)).unwrap(), 18);
        assert_eq!(ledger.raw_principal(&a), before);
        assert_eq!(ledger.balance_of(&a, ts(3600)).unwrap(), before);
        assert_eq!(ledger.settle(&addr("nobody"), ts(3600)).unwrap(), 0);
        assert!(ledger.account(&addr("nobody")).is_none());
    }

    #[test]
    fn computed_total_supply_includes_unsettled_interest() {
        let mut ledger = make_ledger();
        ledger.grant(&custody(), &addr("a"), 100_000, RATE, ts(0)).unwrap();
        ledger.grant(&custody(), &addr("b"), 100_000, RATE, ts(0)).unwrap();
        assert_eq!(ledger.total_supply(), 200_000);
        assert_eq!(ledger.computed_total_supply(ts(3600)).unwrap(), 200_036);
    }

    #[test]
    fn events_are_recorded_in_order() {
        let mut ledger = make_ledger();
        let (a, b) = (addr("a"), addr("b"));
        ledger.grant(&custody(), &a, 100_000, RATE, ts(0)).unwrap();
        ledger.transfer(&a, &b, 10, ts(3600)).unwrap();
        let kinds: Vec<_> = ledger.drain_events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "rate_locked",
                "granted",
                "interest_settled",
                "rate_locked",
                "transferred"
            ]
        );
        assert!(ledger.drain_events().is_empty());
    }
}
