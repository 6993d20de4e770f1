//! Court DTOs for registration, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Court, CourtId};

/// Request body for `POST /courts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterCourtRequest {
    /// Venue the court belongs to.
    pub venue_id: uuid::Uuid,
    /// Display name (e.g. `"Court 5 — clay"`).
    pub name: String,
    /// First bookable hour of the day (inclusive, 0–23).
    pub open_hour: u32,
    /// Hour at which the court closes (exclusive, 1–24).
    pub close_hour: u32,
    /// Price for one one-hour slot, in minor currency units.
    pub hourly_price: i64,
    /// Whether the court accepts bookings. Defaults to `true`.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Court representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourtDto {
    /// Court identifier.
    pub id: CourtId,
    /// Venue the court belongs to.
    pub venue_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// First bookable hour (inclusive).
    pub open_hour: u32,
    /// Closing hour (exclusive).
    pub close_hour: u32,
    /// Hourly price, minor currency units.
    pub hourly_price: i64,
    /// Whether the court accepts bookings.
    pub active: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<Court> for CourtDto {
    fn from(court: Court) -> Self {
        Self {
            id: court.id,
            venue_id: court.venue_id,
            name: court.name,
            open_hour: court.hours.open_hour,
            close_hour: court.hours.close_hour,
            hourly_price: court.hourly_price,
            active: court.active,
            registered_at: court.registered_at,
        }
    }
}

/// Response body for `GET /courts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourtListResponse {
    /// Registered courts.
    pub data: Vec<CourtDto>,
}
