//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{BookingService, PaymentService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Reservations, availability, and blackouts.
    pub booking_service: Arc<BookingService>,
    /// Payment registration and reconciliation.
    pub payment_service: Arc<PaymentService>,
    /// Event bus for the persistence event log and other consumers.
    pub event_bus: EventBus,
}
