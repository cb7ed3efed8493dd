use thiserror::Error;
use tidal_types::ErrorClass;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("rate error: {0}")]
    Rate(#[from] tidal_rate::RateError),

    #[error("ledger error: {0}")]
    Ledger(#[from] tidal_ledger::LedgerError),

    #[error("bridge error: {0}")]
    Bridge(#[from] tidal_bridge::BridgeError),

    #[error("address error: {0}")]
    Address(#[from] tidal_types::AddressError),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging already initialised: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl NodeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Rate(e) => e.class(),
            Self::Ledger(e) => e.class(),
            Self::Bridge(e) => e.class(),
            Self::Address(_) | Self::Config(_) | Self::Snapshot(_) => ErrorClass::Validation,
            Self::Logging(_) | Self::Io(_) | Self::Other(_) => ErrorClass::Protocol,
        }
    }
}
