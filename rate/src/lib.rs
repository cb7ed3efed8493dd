//! Rate registry — the single process-wide yield rate of a domain.
//!
//! The rate is a fixed-point per-second fraction scaled by
//! [`tidal_types::PRECISION`]. It may only ever go down, and only the
//! registry owner may lower it.
//!
//! Lowering the rate never touches existing accounts: each account keeps
//! the rate it locked when its balance last went from zero to positive.
//! Only future grants pick up the new value.

pub mod error;
pub mod history;
pub mod registry;

pub use error::RateError;
pub use history::{RateHistory, RateSegment};
pub use registry::{RateChanged, RateRegistry};
