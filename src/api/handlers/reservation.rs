//! Reservation lifecycle handlers: create, get, list, quote, cancel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    CancelReservationRequest, CancelReservationResponse, CancellationQuoteResponse,
    CreateReservationRequest, PaginationMeta, PaginationParams, ReservationDto,
    ReservationFilterParams, ReservationListResponse,
};
use crate::app_state::AppState;
use crate::domain::{ReservationId, TimeRange};
use crate::error::{BookingError, ErrorResponse};
use crate::service::CreateReservation;

/// `POST /reservations` — Book a court interval.
///
/// # Errors
///
/// Returns [`BookingError::SlotConflict`] when the interval is taken,
/// [`BookingError::CourtNotFound`] for an unknown court, or
/// [`BookingError::InvalidRequest`] for a malformed request.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    summary = "Create a reservation",
    description = "Books a court interval for a client. Availability is re-validated atomically at submission time; a stale slot list returns 409 rather than a double booking. The reservation starts Pending and must be paid to confirm.",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created (Pending)", body = ReservationDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Court not found", body = ErrorResponse),
        (status = 409, description = "Interval no longer available", body = ErrorResponse),
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let range = TimeRange::new(req.start, req.end)?;
    let reservation = state
        .booking_service
        .create_reservation(CreateReservation {
            client_id: req.client_id,
            court_id: req.court_id,
            range,
            party_size: req.party_size,
            extra_amount: req.extra_amount,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationDto::from_domain(reservation, Utc::now())),
    ))
}

/// `GET /reservations` — List reservations with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    summary = "List reservations",
    description = "Returns reservations ordered by start instant, optionally filtered by court and/or client.",
    params(ReservationFilterParams),
    responses(
        (status = 200, description = "Paginated reservation list", body = ReservationListResponse),
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(params): Query<ReservationFilterParams>,
) -> impl IntoResponse {
    let page_params = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    }
    .clamped();
    let now = Utc::now();

    let rows = state
        .booking_service
        .list_reservations(params.court_id, params.client_id)
        .await;
    let total = rows.len() as u32;

    let data: Vec<ReservationDto> = rows
        .into_iter()
        .skip(page_params.offset())
        .take(page_params.per_page as usize)
        .map(|r| ReservationDto::from_domain(r, now))
        .collect();

    Json(ReservationListResponse {
        data,
        pagination: PaginationMeta::for_total(&page_params, total),
    })
}

/// `GET /reservations/:id` — Get one reservation.
///
/// # Errors
///
/// Returns [`BookingError::ReservationNotFound`] if the ID is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    summary = "Get reservation details",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    responses(
        (status = 200, description = "Reservation details", body = ReservationDto),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let reservation = state
        .booking_service
        .get_reservation(ReservationId::from_uuid(id))
        .await?;
    Ok(Json(ReservationDto::from_domain(reservation, Utc::now())))
}

/// `GET /reservations/:id/cancellation-quote` — Preview the cancellation
/// fee without cancelling.
///
/// # Errors
///
/// Returns [`BookingError::ReservationNotFound`] for an unknown ID or
/// [`BookingError::ForbiddenTransition`] for a terminal reservation.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/cancellation-quote",
    tag = "Reservations",
    summary = "Quote the cancellation fee",
    description = "Returns the fee a cancellation right now would incur under the late-cancellation policy, without mutating the reservation.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    responses(
        (status = 200, description = "Fee quote", body = CancellationQuoteResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 422, description = "Reservation already terminal", body = ErrorResponse),
    )
)]
pub async fn cancellation_quote(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let reservation_id = ReservationId::from_uuid(id);
    let quote = state
        .booking_service
        .cancellation_quote(reservation_id, Utc::now())
        .await?;
    Ok(Json(CancellationQuoteResponse {
        reservation_id,
        fee_amount: quote.fee_amount,
        fee_percent: quote.fee_percent,
        late: quote.late,
    }))
}

/// `POST /reservations/:id/cancel` — Cancel a reservation.
///
/// # Errors
///
/// Returns [`BookingError::ReservationNotFound`] for an unknown ID or
/// [`BookingError::ForbiddenTransition`] for a terminal reservation.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    summary = "Cancel a reservation",
    description = "Cancels a Pending or Confirmed reservation, freeing its interval. Cancellations inside the cutoff window incur the late fee returned in the response.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    request_body = CancelReservationRequest,
    responses(
        (status = 200, description = "Reservation cancelled", body = CancelReservationResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 422, description = "Reservation already terminal", body = ErrorResponse),
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CancelReservationRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let now = Utc::now();
    let (cancelled, quote) = state
        .booking_service
        .cancel_reservation(ReservationId::from_uuid(id), req.reason, now)
        .await?;

    Ok(Json(CancelReservationResponse {
        reservation: ReservationDto::from_domain(cancelled, now),
        fee_amount: quote.fee_amount,
        late: quote.late,
    }))
}

/// Reservation lifecycle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            post(create_reservation).get(list_reservations),
        )
        .route("/reservations/{id}", get(get_reservation))
        .route(
            "/reservations/{id}/cancellation-quote",
            get(cancellation_quote),
        )
        .route("/reservations/{id}/cancel", post(cancel_reservation))
}
