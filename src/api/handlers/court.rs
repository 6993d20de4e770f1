//! Court directory handlers: register, list, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{CourtDto, CourtListResponse, RegisterCourtRequest};
use crate::app_state::AppState;
use crate::domain::{Court, CourtId, OperatingHours};
use crate::error::{BookingError, ErrorResponse};

/// `POST /courts` — Register a court in the booking directory.
///
/// # Errors
///
/// Returns [`BookingError::InvalidRequest`] on out-of-range hours or a
/// negative price.
#[utoipa::path(
    post,
    path = "/api/v1/courts",
    tag = "Courts",
    summary = "Register a court",
    description = "Registers (or re-syncs) a court in the booking directory. Courts are reference data owned by the venue catalog.",
    request_body = RegisterCourtRequest,
    responses(
        (status = 201, description = "Court registered", body = CourtDto),
        (status = 400, description = "Invalid court data", body = ErrorResponse),
    )
)]
pub async fn register_court(
    State(state): State<AppState>,
    Json(req): Json<RegisterCourtRequest>,
) -> Result<impl IntoResponse, BookingError> {
    if req.open_hour > 23 || req.close_hour > 24 {
        return Err(BookingError::InvalidRequest(
            "operating hours must fall within the day".to_string(),
        ));
    }
    if req.hourly_price < 0 {
        return Err(BookingError::InvalidRequest(
            "hourly price must be non-negative".to_string(),
        ));
    }

    let court = Court {
        id: CourtId::new(),
        venue_id: req.venue_id,
        name: req.name,
        hours: OperatingHours {
            open_hour: req.open_hour,
            close_hour: req.close_hour,
        },
        hourly_price: req.hourly_price,
        active: req.active,
        registered_at: Utc::now(),
    };
    let id = state.booking_service.register_court(court).await;
    let registered = state.booking_service.courts().get(id).await?;

    Ok((StatusCode::CREATED, Json(CourtDto::from(registered))))
}

/// `GET /courts` — List all registered courts.
#[utoipa::path(
    get,
    path = "/api/v1/courts",
    tag = "Courts",
    summary = "List courts",
    description = "Returns every court registered in the booking directory.",
    responses(
        (status = 200, description = "Court list", body = CourtListResponse),
    )
)]
pub async fn list_courts(State(state): State<AppState>) -> impl IntoResponse {
    let mut courts = state.booking_service.courts().list().await;
    courts.sort_by(|a, b| a.name.cmp(&b.name));
    Json(CourtListResponse {
        data: courts.into_iter().map(CourtDto::from).collect(),
    })
}

/// `GET /courts/:id` — Get one court.
///
/// # Errors
///
/// Returns [`BookingError::CourtNotFound`] if the court does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/courts/{id}",
    tag = "Courts",
    summary = "Get court details",
    params(
        ("id" = uuid::Uuid, Path, description = "Court UUID"),
    ),
    responses(
        (status = 200, description = "Court details", body = CourtDto),
        (status = 404, description = "Court not found", body = ErrorResponse),
    )
)]
pub async fn get_court(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let court = state
        .booking_service
        .courts()
        .get(CourtId::from_uuid(id))
        .await?;
    Ok(Json(CourtDto::from(court)))
}

/// Court directory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courts", get(list_courts).post(register_court))
        .route("/courts/{id}", get(get_court))
}
