//! Service error types with HTTP status code mapping.
//!
//! [`BookingError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ReservationState;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "slot conflict: interval is no longer available on court …",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (stable across releases; see code table below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2099 | Not Found         | 404 Not Found              |
/// | 2100–2199 | Booking Conflict  | 409 Conflict               |
/// | 2200–2299 | State Transition  | 422 Unprocessable Entity   |
/// | 3000–3999 | Server / Upstream | 500 / 502                  |
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Request validation failed before any state was touched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reservation with the given ID was not found.
    #[error("reservation not found: {0}")]
    ReservationNotFound(uuid::Uuid),

    /// Court with the given ID was not found in the directory.
    #[error("court not found: {0}")]
    CourtNotFound(uuid::Uuid),

    /// Blackout with the given ID was not found.
    #[error("blackout not found: {0}")]
    BlackoutNotFound(uuid::Uuid),

    /// No payment transaction matches the given gateway reference.
    #[error("payment transaction not found: {0}")]
    TransactionNotFound(String),

    /// The requested interval failed the availability re-check at creation
    /// time. Callers should re-query availability and pick another slot.
    #[error("slot conflict: interval is no longer available on court {court_id}")]
    SlotConflict {
        /// Court on which the conflict occurred.
        court_id: uuid::Uuid,
    },

    /// Explicit client action attempted a transition the current state
    /// does not permit (e.g. cancelling a completed reservation).
    #[error("forbidden transition from {from} to {to}")]
    ForbiddenTransition {
        /// State the reservation is currently in.
        from: ReservationState,
        /// State the caller tried to move to.
        to: ReservationState,
    },

    /// Payment gateway call failed or timed out. The reservation is left
    /// untouched and the payment may be retried.
    #[error("payment gateway error: {0}")]
    Gateway(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::ReservationNotFound(_) => 2001,
            Self::CourtNotFound(_) => 2002,
            Self::BlackoutNotFound(_) => 2003,
            Self::TransactionNotFound(_) => 2004,
            Self::SlotConflict { .. } => 2101,
            Self::ForbiddenTransition { .. } => 2201,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Gateway(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ReservationNotFound(_)
            | Self::CourtNotFound(_)
            | Self::BlackoutNotFound(_)
            | Self::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict { .. } => StatusCode::CONFLICT,
            Self::ForbiddenTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
