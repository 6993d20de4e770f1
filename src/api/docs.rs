//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::dto::{
    AvailabilityResponse, BlackoutDto, BlackoutListResponse, CancelReservationRequest,
    CancelReservationResponse, CancellationQuoteResponse, CourtDto, CourtListResponse,
    CreateBlackoutRequest, CreateReservationRequest, PaginationMeta, PaymentCallbackRequest,
    RegisterCourtRequest, RegisterPaymentRequest, ReservationDto, ReservationListResponse,
    TransactionDto, TransactionListResponse,
};
use crate::domain::{AvailabilitySlot, PaymentMethod, PaymentState, ReservationState};
use crate::error::{ErrorBody, ErrorResponse};

/// Top-level OpenAPI document for the booking API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "courtside",
        description = "Reservation and payment core for a sports-court booking marketplace."
    ),
    paths(
        super::handlers::court::register_court,
        super::handlers::court::list_courts,
        super::handlers::court::get_court,
        super::handlers::availability::get_availability,
        super::handlers::reservation::create_reservation,
        super::handlers::reservation::list_reservations,
        super::handlers::reservation::get_reservation,
        super::handlers::reservation::cancellation_quote,
        super::handlers::reservation::cancel_reservation,
        super::handlers::payment::register_payment,
        super::handlers::payment::payment_callback,
        super::handlers::payment::sync_payment,
        super::handlers::payment::payment_status,
        super::handlers::payment::list_transactions,
        super::handlers::blackout::create_blackout,
        super::handlers::blackout::list_blackouts,
        super::handlers::blackout::delete_blackout,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        RegisterCourtRequest,
        CourtDto,
        CourtListResponse,
        AvailabilityResponse,
        AvailabilitySlot,
        CreateReservationRequest,
        ReservationDto,
        ReservationListResponse,
        ReservationState,
        CancelReservationRequest,
        CancellationQuoteResponse,
        CancelReservationResponse,
        PaginationMeta,
        RegisterPaymentRequest,
        PaymentCallbackRequest,
        TransactionDto,
        TransactionListResponse,
        PaymentState,
        PaymentMethod,
        CreateBlackoutRequest,
        BlackoutDto,
        BlackoutListResponse,
    ))
)]
pub struct ApiDoc;
