//! Payment handlers: registration, callback, polling sync, and status.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    PaymentCallbackRequest, RegisterPaymentRequest, TransactionDto, TransactionListResponse,
};
use crate::app_state::AppState;
use crate::domain::ReservationId;
use crate::error::{BookingError, ErrorResponse};
use crate::gateway::parse_gateway_status;

/// `POST /reservations/:id/payment` — Register the reservation's total
/// as a debt with the payment gateway.
///
/// # Errors
///
/// Returns [`BookingError::ReservationNotFound`] for an unknown
/// reservation, [`BookingError::ForbiddenTransition`] if it is not
/// awaiting payment, or [`BookingError::Gateway`] when the gateway call
/// fails.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/payment",
    tag = "Payments",
    summary = "Register a payment",
    description = "Registers the reservation's total with the payment gateway and returns the redirect and/or QR handles the client pays through. A gateway failure leaves the reservation payable; simply retry.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    request_body = RegisterPaymentRequest,
    responses(
        (status = 201, description = "Debt registered", body = TransactionDto),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 422, description = "Reservation not awaiting payment", body = ErrorResponse),
        (status = 502, description = "Payment gateway failure", body = ErrorResponse),
    )
)]
pub async fn register_payment(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RegisterPaymentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let transaction = state
        .payment_service
        .register_payment(ReservationId::from_uuid(id), req.client_email)
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionDto::from(transaction))))
}

/// `POST /payments/callback` — Gateway push notification.
///
/// The gateway retries callbacks until acknowledged, so duplicate and
/// out-of-order deliveries are normal; reconciliation is idempotent.
///
/// # Errors
///
/// Returns [`BookingError::TransactionNotFound`] if the reference is
/// unknown.
#[utoipa::path(
    post,
    path = "/api/v1/payments/callback",
    tag = "Payments",
    summary = "Payment gateway callback",
    description = "Receives the gateway's status notification for a registered debt and reconciles the reservation. Safe to deliver any number of times.",
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Status reconciled", body = TransactionDto),
        (status = 404, description = "Unknown transaction reference", body = ErrorResponse),
    )
)]
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(req): Json<PaymentCallbackRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let reported = parse_gateway_status(&req.status);
    let transaction = state
        .payment_service
        .apply_gateway_status(&req.reference, reported)
        .await?;
    Ok(Json(TransactionDto::from(transaction)))
}

/// `POST /reservations/:id/payment/sync` — Poll the gateway and
/// reconcile. Fallback for lost callbacks.
///
/// # Errors
///
/// Returns [`BookingError::TransactionNotFound`] if the reservation has
/// no payment attempts, or [`BookingError::Gateway`] when the lookup
/// fails upstream.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/payment/sync",
    tag = "Payments",
    summary = "Sync payment status",
    description = "Polls the gateway for the reservation's authoritative transaction and reconciles the reported status.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    responses(
        (status = 200, description = "Status reconciled", body = TransactionDto),
        (status = 404, description = "No payment attempts", body = ErrorResponse),
        (status = 502, description = "Payment gateway failure", body = ErrorResponse),
    )
)]
pub async fn sync_payment(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let transaction = state
        .payment_service
        .sync_payment(ReservationId::from_uuid(id))
        .await?;
    Ok(Json(TransactionDto::from(transaction)))
}

/// `GET /reservations/:id/payment` — Authoritative payment status,
/// without touching the gateway.
///
/// # Errors
///
/// Returns [`BookingError::TransactionNotFound`] if the reservation has
/// no payment attempts.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/payment",
    tag = "Payments",
    summary = "Get payment status",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    responses(
        (status = 200, description = "Authoritative transaction", body = TransactionDto),
        (status = 404, description = "No payment attempts", body = ErrorResponse),
    )
)]
pub async fn payment_status(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let transaction = state
        .payment_service
        .payment_status(ReservationId::from_uuid(id))
        .await?;
    Ok(Json(TransactionDto::from(transaction)))
}

/// `GET /reservations/:id/transactions` — Every payment attempt for a
/// reservation, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/transactions",
    tag = "Payments",
    summary = "List payment attempts",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
    ),
    responses(
        (status = 200, description = "Payment attempts", body = TransactionListResponse),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let rows = state
        .payment_service
        .list_transactions(ReservationId::from_uuid(id))
        .await;
    Json(TransactionListResponse {
        data: rows.into_iter().map(TransactionDto::from).collect(),
    })
}

/// Payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations/{id}/payment",
            post(register_payment).get(payment_status),
        )
        .route("/reservations/{id}/payment/sync", post(sync_payment))
        .route("/reservations/{id}/transactions", get(list_transactions))
        .route("/payments/callback", post(payment_callback))
}
