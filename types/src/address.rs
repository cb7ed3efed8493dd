//! Holder / actor address type with `tdl_` prefix.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An identity on a Tidal domain, always prefixed with `tdl_`.
///
/// The same type names account holders, the registry owner, custodians and
/// bridge adapters. Remote identities (adapters and tokens on another
/// domain) use it too; they are opaque to this domain.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Tidal addresses.
    pub const PREFIX: &'static str = "tdl_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `tdl_`. Use [`Address::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with tdl_");
        Self(s)
    }

    /// Parse an address, rejecting malformed input instead of panicking.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AddressError> {
        let s = raw.into();
        let candidate = Self(s);
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(AddressError::Malformed(candidate.0))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX)
            && self.0.len() > Self::PREFIX.len()
            && self.0[Self::PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
