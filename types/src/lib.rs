//! Fundamental types for the Tidal ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, domain identifiers, delivery ids, timestamps, fixed-point
//! parameters, and the error classification used by every engine.

pub mod address;
pub mod domain;
pub mod error;
pub mod hash;
pub mod params;
pub mod time;

pub use address::Address;
pub use domain::DomainId;
pub use error::{AddressError, ErrorClass};
pub use hash::DeliveryId;
pub use params::{DEFAULT_RATE, PRECISION, WITHDRAW_ALL};
pub use time::{Clock, SystemClock, Timestamp};
