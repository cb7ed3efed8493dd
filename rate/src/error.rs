//! Rate-registry errors.

use thiserror::Error;
use tidal_types::{Address, ErrorClass};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    #[error("caller {caller} is not the rate owner")]
    Unauthorized { caller: Address },

    #[error("rate may only decrease: current {current}, attempted {attempted}")]
    RateIncreaseRejected { current: u128, attempted: u128 },

    #[error("rate change timestamp must not precede current segment start")]
    InvalidTimestamp,
}

impl RateError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } | Self::InvalidTimestamp => ErrorClass::Validation,
            Self::RateIncreaseRejected { .. } => ErrorClass::Accounting,
        }
    }
}
