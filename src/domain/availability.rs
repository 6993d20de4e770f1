//! Availability engine: which one-hour slots are bookable on a date.
//!
//! Pure and stateless — the caller supplies the day's blocking
//! reservation intervals and blackout windows, so the same computation
//! serves the booking API and internal consistency checks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{CourtId, TimeRange, court::Court};

/// A one-hour candidate booking window, derived per query and never
/// persisted.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AvailabilitySlot {
    /// Court the slot belongs to.
    pub court_id: CourtId,
    /// Date the slot falls on.
    pub date: NaiveDate,
    /// Slot start instant (inclusive).
    pub start: DateTime<Utc>,
    /// Slot end instant (exclusive).
    pub end: DateTime<Utc>,
    /// `false` when the slot intersects any blocking interval.
    pub available: bool,
    /// Price that would apply if booked, in minor currency units.
    pub price: i64,
}

/// Enumerates the court's one-hour slots for `date` and marks each one
/// unavailable if it intersects any blocking reservation interval or any
/// blackout.
///
/// Slot granularity is fixed at one hour, from `open_hour` (inclusive)
/// to `close_hour` (exclusive). A court with `close_hour <= open_hour`
/// yields an empty sequence — misconfigured hours mean "no availability
/// today", not an error. A multi-hour blocking interval marks every
/// slot it intersects.
#[must_use]
pub fn compute_slots(
    court: &Court,
    date: NaiveDate,
    blocking: &[TimeRange],
    blackouts: &[TimeRange],
) -> Vec<AvailabilitySlot> {
    let open = court.hours.open_hour;
    let close = court.hours.close_hour.min(24);
    if close <= open {
        return Vec::new();
    }

    let mut slots = Vec::with_capacity((close - open) as usize);
    for hour in open..close {
        let Some(slot) = hour_slot(date, hour) else {
            continue;
        };
        let blocked = blocking.iter().any(|r| r.overlaps(&slot))
            || blackouts.iter().any(|r| r.overlaps(&slot));
        slots.push(AvailabilitySlot {
            court_id: court.id,
            date,
            start: slot.start,
            end: slot.end,
            available: !blocked,
            price: court.hourly_price,
        });
    }
    slots
}

/// Builds the `[hour, hour+1)` range on `date`. `None` only for hours
/// that do not exist on the calendar (hour 23 rolls into the next day).
fn hour_slot(date: NaiveDate, hour: u32) -> Option<TimeRange> {
    let start = date.and_hms_opt(hour, 0, 0)?.and_utc();
    let end = start + chrono::Duration::hours(1);
    TimeRange::new(start, end).ok()
}
