//! Global rate history.

use crate::error::RateError;
use serde::{Deserialize, Serialize};
use tidal_types::Timestamp;

/// A period during which one global rate was current.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSegment {
    /// The rate (fixed-point, per second) during this segment.
    pub rate: u128,
    /// When this rate became current.
    pub start: Timestamp,
    /// When this rate was replaced (None if still current).
    pub end: Option<Timestamp>,
}

/// Append-only record of every rate the registry has held.
///
/// Accrual never reads this: accounts carry their own locked rate. The
/// history exists so operators can answer "what rate would a grant at time
/// `t` have locked?".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateHistory {
    segments: Vec<RateSegment>,
}

impl RateHistory {
    pub fn new(initial_rate: u128, genesis: Timestamp) -> Self {
        Self {
            segments: vec![RateSegment {
                rate: initial_rate,
                start: genesis,
                end: None,
            }],
        }
    }

    /// Close the current segment at `change_at` and open a new one.
    ///
    /// Monotonicity is the registry's concern; this only orders segments.
    pub fn push(&mut self, new_rate: u128, change_at: Timestamp) -> Result<(), RateError> {
        if let Some(current) = self.segments.last() {
            if change_at < current.start {
                return Err(RateError::InvalidTimestamp);
            }
        }
        if let Some(current) = self.segments.last_mut() {
            current.end = Some(change_at);
        }
        self.segments.push(RateSegment {
            rate: new_rate,
            start: change_at,
            end: None,
        });
        Ok(())
    }

    /// The currently active rate.
    pub fn current_rate(&self) -> u128 {
        self.segments.last().map(|s| s.rate).unwrap_or(0)
    }

    /// Start of the currently active segment.
    pub fn current_since(&self) -> Timestamp {
        self.segments
            .last()
            .map(|s| s.start)
            .unwrap_or(Timestamp::EPOCH)
    }

    /// The rate that was current at `at`.
    ///
    /// A segment owns its start instant, so a change at `t` is visible at
    /// `t`. Times before genesis report the genesis rate.
    pub fn rate_at(&self, at: Timestamp) -> u128 {
        self.segments
            .iter()
            .rev()
            .find(|s| s.start <= at)
            .or_else(|| self.segments.first())
            .map(|s| s.rate)
            .unwrap_or(0)
    }

    pub fn segments(&self) -> &[RateSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
