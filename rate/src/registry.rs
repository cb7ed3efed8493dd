//! The rate registry.

use crate::error::RateError;
use crate::history::RateHistory;
use serde::{Deserialize, Serialize};
use tidal_types::{Address, Timestamp};

/// Notification produced by a successful [`RateRegistry::set_rate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateChanged {
    pub old: u128,
    pub new: u128,
    pub at: Timestamp,
}

/// Holds the single current rate of a domain.
///
/// Mutation is gated on one owner identity fixed at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateRegistry {
    owner: Address,
    history: RateHistory,
}

impl RateRegistry {
    pub fn new(owner: Address, initial_rate: u128, genesis: Timestamp) -> Self {
        Self {
            owner,
            history: RateHistory::new(initial_rate, genesis),
        }
    }

    /// The rate new grants lock in.
    pub fn current_rate(&self) -> u128 {
        self.history.current_rate()
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Lower the global rate.
    ///
    /// Fails unless `caller` is the owner and `new_rate` is strictly below
    /// the current rate. Existing accounts are unaffected.
    pub fn set_rate(
        &mut self,
        caller: &Address,
        new_rate: u128,
        now: Timestamp,
    ) -> Result<RateChanged, RateError> {
        if caller != &self.owner {
            tracing::warn!(%caller, attempted = new_rate, "rate change by non-owner rejected");
            return Err(RateError::Unauthorized {
                caller: caller.clone(),
            });
        }
        let current = self.current_rate();
        if new_rate >= current {
            return Err(RateError::RateIncreaseRejected {
                current,
                attempted: new_rate,
            });
        }
        self.history.push(new_rate, now)?;
        tracing::info!(old = current, new = new_rate, at = %now, "global rate lowered");
        Ok(RateChanged {
            old: current,
            new: new_rate,
            at: now,
        })
    }

    /// The rate a grant at `at` would have locked.
    pub fn rate_at(&self, at: Timestamp) -> u128 {
        self.history.rate_at(at)
    }

    pub fn history(&self) -> &RateHistory {
        &self.history
    }
}
