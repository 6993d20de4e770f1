//! Store for owner-defined blackout windows.
//!
//! Overlapping blackouts on the same court are permitted — their effects
//! simply union in the availability engine, so no uniqueness constraint
//! is enforced here.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::blackout::Blackout;
use super::{BlackoutId, CourtId, TimeRange};
use crate::error::BookingError;

/// Central store for blackout windows.
#[derive(Debug, Default)]
pub struct BlackoutStore {
    blackouts: RwLock<HashMap<BlackoutId, Blackout>>,
}

impl BlackoutStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a blackout, returning its ID.
    pub async fn insert(&self, blackout: Blackout) -> BlackoutId {
        let id = blackout.id;
        self.blackouts.write().await.insert(id, blackout);
        id
    }

    /// Returns a copy of the blackout with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BlackoutNotFound`] if no such blackout
    /// exists.
    pub async fn get(&self, id: BlackoutId) -> Result<Blackout, BookingError> {
        self.blackouts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookingError::BlackoutNotFound(*id.as_uuid()))
    }

    /// Deletes a blackout, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BlackoutNotFound`] if no such blackout
    /// exists.
    pub async fn delete(&self, id: BlackoutId) -> Result<Blackout, BookingError> {
        self.blackouts
            .write()
            .await
            .remove(&id)
            .ok_or(BookingError::BlackoutNotFound(*id.as_uuid()))
    }

    /// All blackouts for a court, ordered by start instant.
    pub async fn list_for_court(&self, court_id: CourtId) -> Vec<Blackout> {
        let map = self.blackouts.read().await;
        let mut rows: Vec<Blackout> = map
            .values()
            .filter(|b| b.court_id == court_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.range.start);
        rows
    }

    /// Intervals of blackouts on `court_id` overlapping `window`.
    /// Input to the availability engine and the booking conflict check.
    pub async fn ranges_overlapping(&self, court_id: CourtId, window: &TimeRange) -> Vec<TimeRange> {
        self.blackouts
            .read()
            .await
            .values()
            .filter(|b| b.court_id == court_id && b.range.overlaps(window))
            .map(|b| b.range)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

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

    #[tokio::test]
    async fn insert_get_delete_round_trip() {
        let store = BlackoutStore::new();
        let court = CourtId::new();
        let id = store
            .insert(Blackout::new(
                court,
                hour_range(9, 11),
                Some("resurfacing".to_string()),
            ))
            .await;

        let Ok(fetched) = store.get(id).await else {
            panic!("blackout not found");
        };
        assert_eq!(fetched.reason.as_deref(), Some("resurfacing"));

        let Ok(_) = store.delete(id).await else {
            panic!("delete failed");
        };
        assert!(store.get(id).await.is_err());
    }

    #[tokio::test]
    async fn delete_nonexistent_returns_error() {
        let store = BlackoutStore::new();
        let result = store.delete(BlackoutId::new()).await;
        assert!(matches!(result, Err(BookingError::BlackoutNotFound(_))));
    }

    #[tokio::test]
    async fn overlapping_blackouts_are_permitted() {
        let store = BlackoutStore::new();
        let court = CourtId::new();
        store
            .insert(Blackout::new(court, hour_range(9, 12), None))
            .await;
        store
            .insert(Blackout::new(court, hour_range(10, 14), None))
            .await;

        assert_eq!(store.list_for_court(court).await.len(), 2);
    }

    #[tokio::test]
    async fn list_is_scoped_to_court_and_ordered() {
        let store = BlackoutStore::new();
        let court = CourtId::new();
        store
            .insert(Blackout::new(court, hour_range(15, 16), None))
            .await;
        store
            .insert(Blackout::new(court, hour_range(9, 10), None))
            .await;
        store
            .insert(Blackout::new(CourtId::new(), hour_range(9, 10), None))
            .await;

        let rows = store.list_for_court(court).await;
        assert_eq!(rows.len(), 2);
        let Some(first) = rows.first() else {
            panic!("no rows");
        };
        assert_eq!(first.range, hour_range(9, 10));
    }

    #[tokio::test]
    async fn ranges_overlapping_filters_by_window() {
        let store = BlackoutStore::new();
        let court = CourtId::new();
        store
            .insert(Blackout::new(court, hour_range(9, 10), None))
            .await;
        store
            .insert(Blackout::new(court, hour_range(20, 22), None))
            .await;

        let morning = hour_range(8, 12);
        assert_eq!(store.ranges_overlapping(court, &morning).await.len(), 1);
    }
}
