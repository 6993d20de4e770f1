//! Reservation DTOs for create, get, list, quote, and cancel operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::{ClientId, CourtId, Reservation, ReservationId, ReservationState};

/// Request body for `POST /reservations`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    /// Client making the booking.
    pub client_id: ClientId,
    /// Court to book.
    pub court_id: CourtId,
    /// Interval start (must be on the hour).
    pub start: DateTime<Utc>,
    /// Interval end (must be on the hour).
    pub end: DateTime<Utc>,
    /// Number of players attending (at least 1).
    pub party_size: u32,
    /// Extras on top of the court price, minor currency units.
    #[serde(default)]
    pub extra_amount: i64,
}

/// Reservation representation in API responses.
///
/// `state` is the externally visible state: a confirmed reservation
/// whose end has passed reads as `completed`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Client the booking belongs to.
    pub client_id: ClientId,
    /// Court booked.
    pub court_id: CourtId,
    /// Interval start.
    pub start: DateTime<Utc>,
    /// Interval end.
    pub end: DateTime<Utc>,
    /// Number of players attending.
    pub party_size: u32,
    /// Lifecycle state at response time.
    pub state: ReservationState,
    /// Court price for the interval, minor currency units.
    pub base_amount: i64,
    /// Extras, minor currency units.
    pub extra_amount: i64,
    /// `base_amount + extra_amount`.
    pub total_amount: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last state mutation.
    pub updated_at: DateTime<Utc>,
}

impl ReservationDto {
    /// Builds the response view of a reservation as of `now`.
    #[must_use]
    pub fn from_domain(reservation: Reservation, now: DateTime<Utc>) -> Self {
        let state = reservation.effective_state(now);
        Self {
            id: reservation.id,
            client_id: reservation.client_id,
            court_id: reservation.court_id,
            start: reservation.range.start,
            end: reservation.range.end,
            party_size: reservation.party_size,
            state,
            base_amount: reservation.base_amount,
            extra_amount: reservation.extra_amount,
            total_amount: reservation.total_amount,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

/// Query parameters for `GET /reservations`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationFilterParams {
    /// Restrict to one court.
    #[serde(default)]
    pub court_id: Option<CourtId>,
    /// Restrict to one client.
    #[serde(default)]
    pub client_id: Option<ClientId>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Paginated list response for `GET /reservations`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationListResponse {
    /// Reservations ordered by start instant.
    pub data: Vec<ReservationDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Request body for `POST /reservations/:id/cancel`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelReservationRequest {
    /// Caller-supplied reason, recorded in the audit event.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response body for `GET /reservations/:id/cancellation-quote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancellationQuoteResponse {
    /// Reservation quoted.
    pub reservation_id: ReservationId,
    /// Fee a cancellation right now would incur, minor currency units.
    pub fee_amount: i64,
    /// Fee percentage applied (0 when outside the cutoff).
    pub fee_percent: u32,
    /// Whether the cancellation falls inside the late-fee cutoff.
    pub late: bool,
}

/// Response body for `POST /reservations/:id/cancel`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelReservationResponse {
    /// The cancelled reservation.
    pub reservation: ReservationDto,
    /// Fee charged, minor currency units (may be zero).
    pub fee_amount: i64,
    /// Whether the late-fee cutoff applied.
    pub late: bool,
}
