//! Blackout window DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Blackout, BlackoutId, CourtId};

/// Request body for `POST /courts/:id/blackouts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlackoutRequest {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
    /// Optional human-readable reason (e.g. `"resurfacing"`).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Blackout representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlackoutDto {
    /// Blackout identifier.
    pub id: BlackoutId,
    /// Court the window applies to.
    pub court_id: CourtId,
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
    /// Owner-supplied reason, if any.
    pub reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Blackout> for BlackoutDto {
    fn from(blackout: Blackout) -> Self {
        Self {
            id: blackout.id,
            court_id: blackout.court_id,
            start: blackout.range.start,
            end: blackout.range.end,
            reason: blackout.reason,
            created_at: blackout.created_at,
        }
    }
}

/// Response body for `GET /courts/:id/blackouts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlackoutListResponse {
    /// Blackout windows ordered by start instant.
    pub data: Vec<BlackoutDto>,
}
