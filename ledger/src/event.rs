//! Events emitted by ledger mutations.

use serde::{Deserialize, Serialize};
use tidal_types::{Address, Timestamp};

/// What a committed ledger call did, in emission order.
///
/// Events are only recorded for calls that fully applied; a rejected call
/// leaves no trace in the outbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Unsettled interest was folded into principal (a lazy mint).
    InterestSettled {
        account: Address,
        amount: u128,
        at: Timestamp,
    },
    /// An account adopted a new locked rate.
    RateLocked { account: Address, rate: u128 },
    /// Units were credited by a privileged caller.
    Granted {
        account: Address,
        amount: u128,
        by: Address,
    },
    /// Units were debited by a privileged caller.
    Withdrawn {
        account: Address,
        amount: u128,
        by: Address,
    },
    /// Units moved between holders.
    Transferred {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
}

impl LedgerEvent {
    /// Short label used as a structured-log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InterestSettled { .. } => "interest_settled",
            Self::RateLocked { .. } => "rate_locked",
            Self::Granted { .. } => "granted",
            Self::Withdrawn { .. } => "withdrawn",
            Self::Transferred { .. } => "transferred",
            Self::Approval { .. } => "approval",
        }
    }
}
