//! Per-holder account state and the accrual arithmetic.
//!
//! An account's balance is never stored with interest applied. The stored
//! `principal` only grows when a state-changing call settles the account;
//! between settlements the balance is computed on demand:
//!
//! `balance = principal × (PRECISION + rate × elapsed) / PRECISION`
//!
//! Accrual is linear (simple interest) from `last_settled`.

use serde::{Deserialize, Serialize};
use tidal_types::{Timestamp, PRECISION};

use crate::error::LedgerError;

/// Ledger state for a single holder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Credited units, excluding interest accrued since `last_settled`.
    pub principal: u128,
    /// Locked per-second rate, scaled by `PRECISION`.
    pub rate: u128,
    /// When interest was last folded into `principal`.
    pub last_settled: Timestamp,
}

impl Account {
    /// Interest accrued since `last_settled`, rounded down.
    pub fn accrued_interest(&self, now: Timestamp) -> Result<u128, LedgerError> {
        if self.principal == 0 || self.rate == 0 {
            return Ok(0);
        }
        let elapsed = self.last_settled.elapsed_since(now) as u128;
        let growth = self
            .rate
            .checked_mul(elapsed)
            .ok_or(LedgerError::Overflow)?;
        mul_div_precision(self.principal, growth)
    }

    /// Principal plus unsettled interest. Does not mutate.
    pub fn balance_at(&self, now: Timestamp) -> Result<u128, LedgerError> {
        let interest = self.accrued_interest(now)?;
        self.principal
            .checked_add(interest)
            .ok_or(LedgerError::Overflow)
    }

    /// Fold accrued interest into principal and return the amount folded.
    ///
    /// The timestamp only advances when something was folded (or when there
    /// is nothing to accrue on), so a sub-unit remainder keeps accruing
    /// instead of being rounded away on every poke.
    pub fn settle(&mut self, now: Timestamp) -> Result<u128, LedgerError> {
        let owed = self.accrued_interest(now)?;
        if owed > 0 {
            self.principal = self
                .principal
                .checked_add(owed)
                .ok_or(LedgerError::Overflow)?;
            self.last_settled = now;
        } else if self.principal == 0 {
            self.last_settled = now;
        }
        Ok(owed)
    }

    /// Pin `last_settled` to `now` ahead of a principal change.
    ///
    /// Called after [`Account::settle`] by every operation that moves
    /// principal, so newly credited units never accrue for time before they
    /// arrived. Any sub-unit remainder is forfeited.
    pub(crate) fn mark_settled(&mut self, now: Timestamp) {
        if now > self.last_settled {
            self.last_settled = now;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.principal == 0
    }
}

/// `value × growth / PRECISION`, rounded down, without a 256-bit
/// intermediate.
///
/// Splits `value` into whole and fractional multiples of `PRECISION`:
/// `(q·P + r)·g / P = q·g + r·g / P`, exact under floor division because
/// `q·g` is an integer.
pub(crate) fn mul_div_precision(value: u128, growth: u128) -> Result<u128, LedgerError> {
    let whole = value / PRECISION;
    let frac = value % PRECISION;
    let whole_part = whole.checked_mul(growth).ok_or(LedgerError::Overflow)?;
    let frac_part = frac.checked_mul(growth).ok_or(LedgerError::Overflow)? / PRECISION;
    whole_part
        .checked_add(frac_part)
        .ok_or(LedgerError::Overflow)
}
