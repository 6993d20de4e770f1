//! Blackout window handlers: create, list, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{BlackoutDto, BlackoutListResponse, CreateBlackoutRequest};
use crate::app_state::AppState;
use crate::domain::{BlackoutId, CourtId, TimeRange};
use crate::error::{BookingError, ErrorResponse};

/// `POST /courts/:id/blackouts` — Block a court window.
///
/// # Errors
///
/// Returns [`BookingError::CourtNotFound`] for an unknown court or
/// [`BookingError::InvalidRequest`] for a malformed window.
#[utoipa::path(
    post,
    path = "/api/v1/courts/{id}/blackouts",
    tag = "Blackouts",
    summary = "Create a blackout window",
    description = "Blocks a court interval for maintenance or private events. Existing reservations inside the window are untouched; only new bookings are prevented. Overlapping blackouts are allowed and their effects union.",
    params(
        ("id" = uuid::Uuid, Path, description = "Court UUID"),
    ),
    request_body = CreateBlackoutRequest,
    responses(
        (status = 201, description = "Blackout created", body = BlackoutDto),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Court not found", body = ErrorResponse),
    )
)]
pub async fn create_blackout(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CreateBlackoutRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let range = TimeRange::new(req.start, req.end)?;
    let blackout = state
        .booking_service
        .create_blackout(CourtId::from_uuid(id), range, req.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(BlackoutDto::from(blackout))))
}

/// `GET /courts/:id/blackouts` — List a court's blackout windows.
///
/// # Errors
///
/// Returns [`BookingError::CourtNotFound`] if the court does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/courts/{id}/blackouts",
    tag = "Blackouts",
    summary = "List blackout windows",
    params(
        ("id" = uuid::Uuid, Path, description = "Court UUID"),
    ),
    responses(
        (status = 200, description = "Blackout windows", body = BlackoutListResponse),
        (status = 404, description = "Court not found", body = ErrorResponse),
    )
)]
pub async fn list_blackouts(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let rows = state
        .booking_service
        .list_blackouts(CourtId::from_uuid(id))
        .await?;
    Ok(Json(BlackoutListResponse {
        data: rows.into_iter().map(BlackoutDto::from).collect(),
    }))
}

/// `DELETE /blackouts/:id` — Remove a blackout window.
///
/// # Errors
///
/// Returns [`BookingError::BlackoutNotFound`] if the ID is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/blackouts/{id}",
    tag = "Blackouts",
    summary = "Delete a blackout window",
    description = "Removes the window; its slots become bookable again immediately.",
    params(
        ("id" = uuid::Uuid, Path, description = "Blackout UUID"),
    ),
    responses(
        (status = 204, description = "Blackout deleted"),
        (status = 404, description = "Blackout not found", body = ErrorResponse),
    )
)]
pub async fn delete_blackout(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    state
        .booking_service
        .delete_blackout(BlackoutId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Blackout routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courts/{id}/blackouts",
            get(list_blackouts).post(create_blackout),
        )
        .route("/blackouts/{id}", delete(delete_blackout))
}
