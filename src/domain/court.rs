//! Court reference data consumed by the booking core.
//!
//! Courts are owned by the venue catalog; the booking core never mutates
//! them beyond registration. [`CourtDirectory`] is the read-mostly
//! in-process mirror the catalog syncs into.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::CourtId;
use crate::error::BookingError;

/// Daily operating window of a court, in whole hours of the day.
///
/// A court with `close_hour <= open_hour` is treated as having no
/// availability (misconfigured hours never error, per the availability
/// contract).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OperatingHours {
    /// First bookable hour of the day (inclusive, 0–23).
    pub open_hour: u32,
    /// Hour at which the court closes (exclusive, 1–24).
    pub close_hour: u32,
}

/// A bookable court as seen by the reservation core.
#[derive(Debug, Clone, Serialize)]
pub struct Court {
    /// Court identifier.
    pub id: CourtId,
    /// Identifier of the venue that owns this court.
    pub venue_id: uuid::Uuid,
    /// Display name (e.g. `"Court 5 — clay"`).
    pub name: String,
    /// Daily operating window.
    pub hours: OperatingHours,
    /// Price for one one-hour slot, in minor currency units.
    pub hourly_price: i64,
    /// Inactive courts accept no new reservations or blackouts.
    pub active: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// In-memory directory of court reference data.
///
/// Read-mostly: courts are registered (or re-synced) rarely and read on
/// every availability query and booking attempt.
#[derive(Debug, Default)]
pub struct CourtDirectory {
    courts: RwLock<HashMap<CourtId, Court>>,
}

impl CourtDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a court, replacing any previous entry with the same ID.
    pub async fn register(&self, court: Court) -> CourtId {
        let id = court.id;
        self.courts.write().await.insert(id, court);
        id
    }

    /// Returns a copy of the court with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CourtNotFound`] if no such court exists.
    pub async fn get(&self, id: CourtId) -> Result<Court, BookingError> {
        self.courts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookingError::CourtNotFound(*id.as_uuid()))
    }

    /// Returns all registered courts, unordered.
    pub async fn list(&self) -> Vec<Court> {
        self.courts.read().await.values().cloned().collect()
    }

    /// Number of registered courts.
    pub async fn len(&self) -> usize {
        self.courts.read().await.len()
    }

    /// Returns `true` if no courts are registered.
    pub async fn is_empty(&self) -> bool {
        self.courts.read().await.is_empty()
    }
}
