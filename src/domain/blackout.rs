//! Owner-defined exclusion windows per court.
//!
//! A blackout (maintenance, private event) makes its interval unbookable.
//! The availability engine treats blackouts exactly like blocking
//! reservations; they carry no payment relationship.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BlackoutId, CourtId, TimeRange};

/// An interval during which a court cannot be booked.
#[derive(Debug, Clone, Serialize)]
pub struct Blackout {
    /// Blackout identifier.
    pub id: BlackoutId,
    /// Court the window applies to.
    pub court_id: CourtId,
    /// Excluded interval `[start, end)`.
    pub range: TimeRange,
    /// Optional owner-supplied reason.
    pub reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Blackout {
    /// Creates a new blackout for the given court and interval.
    #[must_use]
    pub fn new(court_id: CourtId, range: TimeRange, reason: Option<String>) -> Self {
        Self {
            id: BlackoutId::new(),
            court_id,
            range,
            reason,
            created_at: Utc::now(),
        }
    }
}
