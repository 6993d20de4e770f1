//! Half-open time interval with overlap arithmetic.
//!
//! Every interval in the booking core — reservations, blackouts, candidate
//! slots — is a [`TimeRange`] over `[start, end)`. Two ranges overlap iff
//! `a.start < b.end && b.start < a.end`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// A half-open UTC interval `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start instant.
    pub start: DateTime<Utc>,
    /// Exclusive end instant.
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new range, rejecting empty or inverted intervals.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidRequest`] if `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidRequest(format!(
                "interval end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Returns `true` if the two half-open intervals share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns `true` if `instant` lies within `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Duration of the range in whole hours, rounding up partial hours.
    #[must_use]
    pub fn whole_hours(&self) -> i64 {
        let minutes = (self.end - self.start).num_minutes();
        minutes / 60 + i64::from(minutes % 60 > 0)
    }

    /// Returns `true` if both endpoints fall exactly on an hour boundary.
    #[must_use]
    pub fn is_hour_aligned(&self) -> bool {
        use chrono::Timelike;
        let aligned = |t: DateTime<Utc>| t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0;
        aligned(self.start) && aligned(self.end)
    }
}
