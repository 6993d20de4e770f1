//! Availability query handler.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{AvailabilityParams, AvailabilityResponse};
use crate::app_state::AppState;
use crate::domain::CourtId;
use crate::error::{BookingError, ErrorResponse};

/// `GET /courts/:id/availability` — One-hour slots for a court on a date.
///
/// # Errors
///
/// Returns [`BookingError::CourtNotFound`] if the court does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/courts/{id}/availability",
    tag = "Availability",
    summary = "Query slot availability",
    description = "Enumerates the court's one-hour slots for the given date across its operating window. Each slot carries the price that would apply and whether it is still bookable. A court closed that day yields an empty slot list.",
    params(
        ("id" = uuid::Uuid, Path, description = "Court UUID"),
        AvailabilityParams,
    ),
    responses(
        (status = 200, description = "Slot availability", body = AvailabilityResponse),
        (status = 404, description = "Court not found", body = ErrorResponse),
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, BookingError> {
    let court_id = CourtId::from_uuid(id);
    let slots = state
        .booking_service
        .availability(court_id, params.date)
        .await?;
    Ok(Json(AvailabilityResponse {
        court_id,
        date: params.date,
        slots,
    }))
}

/// Availability routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/courts/{id}/availability", get(get_availability))
}
