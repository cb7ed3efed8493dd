//! Fixed-point parameters shared by the rate registry, ledger and bridge.

/// Scale of every rate: a rate of `PRECISION` means 100% growth per second.
///
/// Rates are per-second fractions, so realistic yields are tiny; `5e10`
/// is roughly 0.018% per hour.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Sentinel amount meaning "the entire current balance".
///
/// Accepted by `withdraw`, by outbound bridging, and as an unlimited
/// allowance.
pub const WITHDRAW_ALL: u128 = u128::MAX;

/// Rate installed on a fresh registry when no configuration overrides it.
pub const DEFAULT_RATE: u128 = 50_000_000_000;
