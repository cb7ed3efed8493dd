//! Nullable infrastructure for deterministic testing.
//!
//! The ledger core never reads wall-clock time and never talks to a real
//! transport. This crate provides test-friendly stand-ins for those
//! collaborators that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Can reproduce transport misbehaviour (duplicates, reordering)
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod transport;
pub mod validator;

pub use clock::NullClock;
pub use transport::NullTransport;
pub use validator::NullValidator;
