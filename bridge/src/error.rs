//! Bridge errors.

use thiserror::Error;
use tidal_ledger::LedgerError;
use tidal_types::{Address, DeliveryId, DomainId, ErrorClass};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("caller {caller} may not drive this adapter")]
    Unauthorized { caller: Address },

    #[error("bridged amount must be non-zero")]
    ZeroAmount,

    #[error("sender {sender} is not allowed to bridge")]
    SenderNotAllowed { sender: Address },

    #[error("{adapter} is not the trusted adapter for {domain}")]
    UntrustedSource { domain: DomainId, adapter: Address },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("delivery {0} was already credited")]
    DuplicateDelivery(DeliveryId),

    #[error("validator rejected transfer: {0}")]
    Rejected(String),

    #[error("no route configured for {0}")]
    UnknownRoute(DomainId),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl BridgeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Ledger(e) => e.class(),
            Self::UnknownRoute(_) => ErrorClass::Protocol,
            Self::Unauthorized { .. }
            | Self::ZeroAmount
            | Self::SenderNotAllowed { .. }
            | Self::UntrustedSource { .. }
            | Self::MalformedPayload(_)
            | Self::DuplicateDelivery(_)
            | Self::Rejected(_) => ErrorClass::Validation,
        }
    }
}
