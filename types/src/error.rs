//! Error classification shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse category every engine error falls into.
///
/// None of them are retried internally; the caller either corrects its
/// input or abandons the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Unauthorized caller, untrusted remote, malformed payload or request.
    /// Always rejected before any state mutation.
    Validation,
    /// Balance, allowance, rate-monotonicity or arithmetic failures.
    Accounting,
    /// Missing routing configuration for a destination domain.
    Protocol,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Accounting => "accounting",
            Self::Protocol => "protocol",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("malformed address: {0:?}")]
    Malformed(String),
}
