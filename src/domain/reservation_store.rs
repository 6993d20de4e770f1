//! Reservation store with an atomic conflict-checked insert.
//!
//! The primary correctness risk in the booking flow is two clients
//! racing for the same court interval. [`ReservationStore::insert_checked`]
//! closes that race by re-checking overlap against every non-cancelled
//! reservation for the court *inside the same write critical section* as
//! the insert — the in-process equivalent of a SERIALIZABLE
//! check-then-insert transaction. Losers get a conflict, never a silent
//! double booking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::reservation::Reservation;
use super::{CourtId, ReservationId, TimeRange};
use crate::error::BookingError;

/// Central store for all reservations. Rows are never deleted.
#[derive(Debug, Default)]
pub struct ReservationStore {
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

impl ReservationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically re-checks availability and inserts the reservation.
    ///
    /// `blackouts` is the caller's snapshot of the court's blackout
    /// windows; the overlap check against existing reservations always
    /// uses the latest data under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::SlotConflict`] if the interval overlaps
    /// any non-cancelled reservation on the same court or any supplied
    /// blackout window.
    pub async fn insert_checked(
        &self,
        reservation: Reservation,
        blackouts: &[TimeRange],
    ) -> Result<ReservationId, BookingError> {
        let mut map = self.reservations.write().await;

        let conflict = map.values().any(|existing| {
            existing.court_id == reservation.court_id
                && existing.is_blocking()
                && existing.range.overlaps(&reservation.range)
        }) || blackouts.iter().any(|b| b.overlaps(&reservation.range));

        if conflict {
            return Err(BookingError::SlotConflict {
                court_id: *reservation.court_id.as_uuid(),
            });
        }

        let id = reservation.id;
        map.insert(id, reservation);
        Ok(id)
    }

    /// Returns a copy of the reservation with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] if no such
    /// reservation exists.
    pub async fn get(&self, id: ReservationId) -> Result<Reservation, BookingError> {
        self.reservations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookingError::ReservationNotFound(*id.as_uuid()))
    }

    /// Applies the idempotent Pending → Confirmed transition under the
    /// write lock. Returns the updated reservation and whether the state
    /// actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] if no such
    /// reservation exists.
    pub async fn confirm(
        &self,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<(Reservation, bool), BookingError> {
        let mut map = self.reservations.write().await;
        let reservation = map
            .get_mut(&id)
            .ok_or(BookingError::ReservationNotFound(*id.as_uuid()))?;
        let changed = reservation.confirm(now)?;
        Ok((reservation.clone(), changed))
    }

    /// Applies the transition to Cancelled under the write lock and
    /// returns the updated reservation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] if the ID is
    /// unknown, or [`BookingError::ForbiddenTransition`] if the
    /// reservation is already terminal at `now`.
    pub async fn cancel(
        &self,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<Reservation, BookingError> {
        let mut map = self.reservations.write().await;
        let reservation = map
            .get_mut(&id)
            .ok_or(BookingError::ReservationNotFound(*id.as_uuid()))?;
        reservation.cancel(now)?;
        Ok(reservation.clone())
    }

    /// Intervals of non-cancelled reservations on `court_id` that overlap
    /// `window`. Input to the availability engine.
    pub async fn blocking_ranges(&self, court_id: CourtId, window: &TimeRange) -> Vec<TimeRange> {
        self.reservations
            .read()
            .await
            .values()
            .filter(|r| r.court_id == court_id && r.is_blocking() && r.range.overlaps(window))
            .map(|r| r.range)
            .collect()
    }

    /// Reservations filtered by court and/or client, ordered by start
    /// instant.
    pub async fn list(
        &self,
        court_id: Option<CourtId>,
        client_id: Option<super::ClientId>,
    ) -> Vec<Reservation> {
        let map = self.reservations.read().await;
        let mut rows: Vec<Reservation> = map
            .values()
            .filter(|r| court_id.is_none_or(|c| r.court_id == c))
            .filter(|r| client_id.is_none_or(|c| r.client_id == c))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.range.start);
        rows
    }

    /// IDs of Pending reservations created at or before `cutoff`.
    /// Input to the expiry sweep.
    pub async fn stale_pending(&self, cutoff: DateTime<Utc>) -> Vec<ReservationId> {
        self.reservations
            .read()
            .await
            .values()
            .filter(|r| r.state == super::ReservationState::Pending && r.created_at <= cutoff)
            .map(|r| r.id)
            .collect()
    }

    /// Number of stored reservations, including terminal ones.
    pub async fn len(&self) -> usize {
        self.reservations.read().await.len()
    }

    /// Returns `true` if the store holds no reservations.
    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, ReservationState};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

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

    fn make_reservation(court_id: CourtId, start_h: u32, end_h: u32) -> Reservation {
        Reservation::new(
            ClientId::new(),
            court_id,
            hour_range(start_h, end_h),
            2,
            10_000,
            0,
        )
    }

    #[tokio::test]
    async fn insert_then_overlapping_insert_conflicts() {
        let store = ReservationStore::new();
        let court = CourtId::new();

        let first = store
            .insert_checked(make_reservation(court, 10, 12), &[])
            .await;
        assert!(first.is_ok());

        let second = store
            .insert_checked(make_reservation(court, 11, 13), &[])
            .await;
        assert!(matches!(second, Err(BookingError::SlotConflict { .. })));
    }

    #[tokio::test]
    async fn adjacent_intervals_coexist() {
        let store = ReservationStore::new();
        let court = CourtId::new();

        let a = store
            .insert_checked(make_reservation(court, 10, 11), &[])
            .await;
        let b = store
            .insert_checked(make_reservation(court, 11, 12), &[])
            .await;
        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn other_court_does_not_conflict() {
        let store = ReservationStore::new();
        let a = store
            .insert_checked(make_reservation(CourtId::new(), 10, 12), &[])
            .await;
        let b = store
            .insert_checked(make_reservation(CourtId::new(), 10, 12), &[])
            .await;
        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn cancelled_reservation_frees_the_interval() {
        let store = ReservationStore::new();
        let court = CourtId::new();
        let res = make_reservation(court, 10, 12);
        let before_start = res.range.start - Duration::hours(48);

        let Ok(id) = store.insert_checked(res, &[]).await else {
            panic!("insert failed");
        };
        let Ok(_) = store.cancel(id, before_start).await else {
            panic!("cancel failed");
        };

        let retry = store
            .insert_checked(make_reservation(court, 10, 12), &[])
            .await;
        assert!(retry.is_ok());
    }

    #[tokio::test]
    async fn blackout_snapshot_blocks_insert() {
        let store = ReservationStore::new();
        let court = CourtId::new();
        let blackouts = vec![hour_range(9, 13)];

        let result = store
            .insert_checked(make_reservation(court, 10, 11), &blackouts)
            .await;
        assert!(matches!(result, Err(BookingError::SlotConflict { .. })));
    }

    #[tokio::test]
    async fn concurrent_inserts_yield_one_winner() {
        let store = Arc::new(ReservationStore::new());
        let court = CourtId::new();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert_checked(make_reservation(court, 14, 15), &[])
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            match result {
                Ok(_) => successes += 1,
                Err(BookingError::SlotConflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn confirm_is_idempotent_through_store() {
        let store = ReservationStore::new();
        let res = make_reservation(CourtId::new(), 10, 11);
        let now = res.range.start - Duration::hours(1);
        let Ok(id) = store.insert_checked(res, &[]).await else {
            panic!("insert failed");
        };

        let Ok((updated, changed)) = store.confirm(id, now).await else {
            panic!("confirm failed");
        };
        assert!(changed);
        assert_eq!(updated.state, ReservationState::Confirmed);

        let Ok((_, changed)) = store.confirm(id, now).await else {
            panic!("confirm failed");
        };
        assert!(!changed);
    }

    #[tokio::test]
    async fn blocking_ranges_exclude_cancelled() {
        let store = ReservationStore::new();
        let court = CourtId::new();
        let res = make_reservation(court, 10, 12);
        let window = hour_range(8, 22);
        let before_start = res.range.start - Duration::hours(48);

        let Ok(id) = store.insert_checked(res, &[]).await else {
            panic!("insert failed");
        };
        assert_eq!(store.blocking_ranges(court, &window).await.len(), 1);

        let Ok(_) = store.cancel(id, before_start).await else {
            panic!("cancel failed");
        };
        assert!(store.blocking_ranges(court, &window).await.is_empty());
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let store = ReservationStore::new();
        let court = CourtId::new();
        let late = make_reservation(court, 18, 19);
        let early = make_reservation(court, 9, 10);
        let client = early.client_id;

        let Ok(_) = store.insert_checked(late, &[]).await else {
            panic!("insert failed");
        };
        let Ok(_) = store.insert_checked(early, &[]).await else {
            panic!("insert failed");
        };
        let Ok(_) = store
            .insert_checked(make_reservation(CourtId::new(), 9, 10), &[])
            .await
        else {
            panic!("insert failed");
        };

        let by_court = store.list(Some(court), None).await;
        assert_eq!(by_court.len(), 2);
        let hours: Vec<_> = by_court.iter().map(|r| r.range.start).collect();
        assert!(hours.windows(2).all(|w| matches!(w, [a, b] if a <= b)));

        let by_client = store.list(None, Some(client)).await;
        assert_eq!(by_client.len(), 1);
    }

    #[tokio::test]
    async fn stale_pending_finds_only_old_pending() {
        let store = ReservationStore::new();
        let res = make_reservation(CourtId::new(), 10, 11);
        let confirmed = make_reservation(CourtId::new(), 12, 13);
        let now = Utc::now();
        let confirm_at = confirmed.range.start - Duration::days(300);

        let Ok(stale_id) = store.insert_checked(res, &[]).await else {
            panic!("insert failed");
        };
        let Ok(confirmed_id) = store.insert_checked(confirmed, &[]).await else {
            panic!("insert failed");
        };
        let Ok(_) = store.confirm(confirmed_id, confirm_at).await else {
            panic!("confirm failed");
        };

        let stale = store.stale_pending(now + Duration::hours(1)).await;
        assert_eq!(stale, vec![stale_id]);

        // Nothing is stale before anything was created.
        let none = store.stale_pending(now - Duration::hours(1)).await;
        assert!(none.is_empty());
    }
}
