//! Domain (chain) identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an independent execution domain holding its own ledger.
///
/// Domains are numbered by the routing configuration; the number carries no
/// meaning beyond equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(u32);

impl DomainId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain-{}", self.0)
    }
}

impl From<u32> for DomainId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
