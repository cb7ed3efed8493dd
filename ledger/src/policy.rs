//! Injected authorization policy.
//!
//! There is no ambient permission state: whoever constructs a `Ledger` (or
//! a bridge adapter) hands it an `AccessPolicy` naming exactly who may call
//! its privileged operations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tidal_types::Address;

use crate::error::LedgerError;

/// One owner plus a small allow-set of privileged callers.
///
/// The owner administers the allow-set; membership is what gates `grant`
/// and `withdraw`. The owner is not implicitly privileged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    owner: Address,
    privileged: BTreeSet<Address>,
}

impl AccessPolicy {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            privileged: BTreeSet::new(),
        }
    }

    /// Builder-style: add callers to the allow-set.
    pub fn with_privileged(mut self, callers: impl IntoIterator<Item = Address>) -> Self {
        self.privileged.extend(callers);
        self
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        &self.owner == caller
    }

    pub fn is_privileged(&self, caller: &Address) -> bool {
        self.privileged.contains(caller)
    }

    pub fn privileged(&self) -> impl Iterator<Item = &Address> {
        self.privileged.iter()
    }

    pub fn require_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }

    pub fn require_privileged(&self, caller: &Address) -> Result<(), LedgerError> {
        if self.is_privileged(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }

    /// Owner-only: admit `who` to the allow-set. Returns whether it was new.
    pub fn admit(&mut self, caller: &Address, who: Address) -> Result<bool, LedgerError> {
        self.require_owner(caller)?;
        Ok(self.privileged.insert(who))
    }

    /// Owner-only: remove `who` from the allow-set. Returns whether it was present.
    pub fn revoke(&mut self, caller: &Address, who: &Address) -> Result<bool, LedgerError> {
        self.require_owner(caller)?;
        Ok(self.privileged.remove(who))
    }
}
