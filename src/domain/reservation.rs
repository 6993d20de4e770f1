//! Reservation aggregate and its lifecycle state machine.
//!
//! A reservation moves `Pending → Confirmed → Completed`, with
//! `Cancelled` reachable from either non-terminal state. `Completed` is
//! derived at read time from a Confirmed reservation whose end has
//! passed; it is never stored. Reservations are never deleted —
//! cancellation is a state transition, not removal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClientId, CourtId, ReservationId, TimeRange};
use crate::error::BookingError;

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    /// Created, awaiting payment confirmation.
    Pending,
    /// Payment verified by the gateway.
    Confirmed,
    /// Cancelled by the client, an administrator, or the expiry sweep.
    /// Terminal.
    Cancelled,
    /// Confirmed and past its end instant. Terminal; derived, not stored.
    Completed,
}

impl ReservationState {
    /// Returns `true` for states no transition may leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// A booking of a court interval by a client.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Client the booking belongs to.
    pub client_id: ClientId,
    /// Court being booked.
    pub court_id: CourtId,
    /// Booked interval `[start, end)`.
    pub range: TimeRange,
    /// Number of players attending.
    pub party_size: u32,
    /// Court price for the interval, in minor currency units.
    pub base_amount: i64,
    /// Extras (equipment rental etc.), in minor currency units.
    pub extra_amount: i64,
    /// `base_amount + extra_amount`.
    pub total_amount: i64,
    /// Stored lifecycle state. Use [`Reservation::effective_state`] for
    /// the externally visible state.
    pub state: ReservationState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last state mutation.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new Pending reservation.
    #[must_use]
    pub fn new(
        client_id: ClientId,
        court_id: CourtId,
        range: TimeRange,
        party_size: u32,
        base_amount: i64,
        extra_amount: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReservationId::new(),
            client_id,
            court_id,
            range,
            party_size,
            base_amount,
            extra_amount,
            total_amount: base_amount + extra_amount,
            state: ReservationState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Externally visible state: a Confirmed reservation whose end has
    /// passed reads as Completed.
    #[must_use]
    pub fn effective_state(&self, now: DateTime<Utc>) -> ReservationState {
        if self.state == ReservationState::Confirmed && now >= self.range.end {
            ReservationState::Completed
        } else {
            self.state
        }
    }

    /// Whether this reservation blocks its interval for availability.
    /// Every non-cancelled reservation does.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.state != ReservationState::Cancelled
    }

    /// Applies the Pending → Confirmed transition.
    ///
    /// Idempotent for reconciliation: confirming an already-Confirmed
    /// reservation reports `Ok(false)`; a Cancelled reservation is left
    /// untouched and also reports `Ok(false)` (a late Paid notification
    /// must never resurrect it).
    ///
    /// # Errors
    ///
    /// This guard never fails today; the `Result` keeps the signature
    /// aligned with [`Reservation::cancel`].
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<bool, BookingError> {
        match self.state {
            ReservationState::Pending => {
                self.state = ReservationState::Confirmed;
                self.updated_at = now;
                Ok(true)
            }
            ReservationState::Confirmed
            | ReservationState::Cancelled
            | ReservationState::Completed => Ok(false),
        }
    }

    /// Applies the transition to Cancelled.
    ///
    /// Permitted from Pending and from Confirmed reservations that have
    /// not yet finished. Explicit cancellation of a terminal reservation
    /// is rejected rather than swallowed.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ForbiddenTransition`] if the effective
    /// state at `now` is Cancelled or Completed.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), BookingError> {
        let effective = self.effective_state(now);
        if effective.is_terminal() {
            return Err(BookingError::ForbiddenTransition {
                from: effective,
                to: ReservationState::Cancelled,
            });
        }
        self.state = ReservationState::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hour_range(start_h: u32, end_h: u32) -> TimeRange {
        let Some(start) = Utc.with_ymd_and_hms(2024, 6, 1, start_h, 0, 0).single() else {
            panic!("valid start");
        };
        let Some(end) = Utc.with_ymd_and_hms(2024, 6, 1, end_h, 0, 0).single() else {
            panic!("valid end");
        };
        let Ok(range) = TimeRange::new(start, end) else {
            panic!("valid range");
        };
        range
    }

    fn make_reservation() -> Reservation {
        Reservation::new(
            ClientId::new(),
            CourtId::new(),
            hour_range(14, 15),
            4,
            10_000,
            0,
        )
    }

    #[test]
    fn new_reservation_is_pending_with_total() {
        let res = Reservation::new(
            ClientId::new(),
            CourtId::new(),
            hour_range(14, 16),
            2,
            20_000,
            1_500,
        );
        assert_eq!(res.state, ReservationState::Pending);
        assert_eq!(res.total_amount, 21_500);
        assert!(res.is_blocking());
    }

    #[test]
    fn confirm_from_pending_transitions_once() {
        let mut res = make_reservation();
        let now = res.range.start - Duration::hours(2);

        let Ok(changed) = res.confirm(now) else {
            panic!("confirm failed");
        };
        assert!(changed);
        assert_eq!(res.state, ReservationState::Confirmed);

        // Second application is an idempotent no-op.
        let Ok(changed) = res.confirm(now) else {
            panic!("confirm failed");
        };
        assert!(!changed);
    }

    #[test]
    fn confirm_does_not_resurrect_cancelled() {
        let mut res = make_reservation();
        let now = res.range.start - Duration::hours(2);
        let Ok(()) = res.cancel(now) else {
            panic!("cancel failed");
        };

        let Ok(changed) = res.confirm(now) else {
            panic!("confirm failed");
        };
        assert!(!changed);
        assert_eq!(res.state, ReservationState::Cancelled);
        assert!(!res.is_blocking());
    }

    #[test]
    fn confirmed_past_end_reads_completed() {
        let mut res = make_reservation();
        let before = res.range.start - Duration::hours(1);
        let Ok(_) = res.confirm(before) else {
            panic!("confirm failed");
        };

        assert_eq!(res.effective_state(before), ReservationState::Confirmed);
        let after = res.range.end + Duration::minutes(1);
        assert_eq!(res.effective_state(after), ReservationState::Completed);
    }

    #[test]
    fn pending_past_end_is_not_completed() {
        let res = make_reservation();
        let after = res.range.end + Duration::hours(1);
        assert_eq!(res.effective_state(after), ReservationState::Pending);
    }

    #[test]
    fn cancel_completed_is_forbidden() {
        let mut res = make_reservation();
        let before = res.range.start - Duration::hours(1);
        let Ok(_) = res.confirm(before) else {
            panic!("confirm failed");
        };

        let after = res.range.end + Duration::hours(1);
        let result = res.cancel(after);
        assert!(matches!(
            result,
            Err(BookingError::ForbiddenTransition {
                from: ReservationState::Completed,
                ..
            })
        ));
    }

    #[test]
    fn cancel_twice_is_forbidden() {
        let mut res = make_reservation();
        let now = res.range.start - Duration::hours(30);
        let Ok(()) = res.cancel(now) else {
            panic!("cancel failed");
        };
        assert!(res.cancel(now).is_err());
    }

    #[test]
    fn cancel_confirmed_before_end_is_allowed() {
        let mut res = make_reservation();
        let now = res.range.start - Duration::hours(2);
        let Ok(_) = res.confirm(now) else {
            panic!("confirm failed");
        };
        let Ok(()) = res.cancel(now) else {
            panic!("cancel failed");
        };
        assert_eq!(res.state, ReservationState::Cancelled);
    }
}
