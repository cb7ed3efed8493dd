//! Interest-accruing ledger.
//!
//! Each holder's balance grows linearly at the rate it locked when its
//! balance last went from zero to positive. There is no periodic rebase:
//! `balance_of` computes the accrued balance on demand, and interest is only
//! physically folded into stored principal ("settled") by calls that read
//! or change that principal.

pub mod account;
pub mod error;
pub mod event;
pub mod ledger;
pub mod policy;
pub mod snapshot;

pub use account::Account;
pub use error::LedgerError;
pub use event::LedgerEvent;
pub use ledger::{GrantOutcome, Ledger, RateAssignment, SupplyTotals};
pub use policy::AccessPolicy;
pub use snapshot::{AccountSnapshot, AllowanceSnapshot, LedgerSnapshot, SNAPSHOT_VERSION};
