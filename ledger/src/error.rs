use thiserror::Error;
use tidal_types::{Address, ErrorClass};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller {caller} is not authorized for this operation")]
    Unauthorized { caller: Address },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, available {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in ledger computation")]
    Overflow,

    #[error("snapshot hash mismatch: expected {expected}, computed {computed}")]
    SnapshotCorrupt { expected: String, computed: String },

    #[error(
        "snapshot totals disagree with account principal {principal}: \
         granted {granted}, withdrawn {withdrawn}, settled interest {interest_settled}"
    )]
    SupplyMismatch {
        principal: u128,
        granted: u128,
        withdrawn: u128,
        interest_settled: u128,
    },

    #[error("unsupported snapshot version {0}")]
    SnapshotVersion(u32),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. }
            | Self::ZeroAmount
            | Self::SnapshotCorrupt { .. }
            | Self::SnapshotVersion(_)
            | Self::Serialization(_) => ErrorClass::Validation,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::Overflow
            | Self::SupplyMismatch { .. } => ErrorClass::Accounting,
        }
    }
}
