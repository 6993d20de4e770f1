//! Payment DTOs: registration, callback, sync, and status views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PaymentMethod, PaymentState, PaymentTransaction, ReservationId, TransactionId};

/// Request body for `POST /reservations/:id/payment`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterPaymentRequest {
    /// Payer email for gateway receipts, if known.
    #[serde(default)]
    pub client_email: Option<String>,
}

/// Payment transaction representation in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionDto {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Reservation this attempt pays for.
    pub reservation_id: ReservationId,
    /// Gateway-side transaction reference.
    pub external_ref: String,
    /// Payment method the gateway issued handles for.
    pub method: PaymentMethod,
    /// Amount, minor currency units.
    pub amount: i64,
    /// Current gateway-reported state.
    pub state: PaymentState,
    /// Hosted card form URL, if any.
    pub redirect_url: Option<String>,
    /// QR asset URL, if any.
    pub qr_url: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Capture timestamp, set once the payment is captured.
    pub captured_at: Option<DateTime<Utc>>,
}

impl From<PaymentTransaction> for TransactionDto {
    fn from(tx: PaymentTransaction) -> Self {
        Self {
            id: tx.id,
            reservation_id: tx.reservation_id,
            external_ref: tx.external_ref,
            method: tx.method,
            amount: tx.amount,
            state: tx.state,
            redirect_url: tx.redirect_url,
            qr_url: tx.qr_url,
            created_at: tx.created_at,
            captured_at: tx.captured_at,
        }
    }
}

/// Callback body the payment gateway posts to `POST /payments/callback`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentCallbackRequest {
    /// Gateway-side transaction reference.
    pub reference: String,
    /// Gateway status string (e.g. `"approved"`, `"rejected"`).
    pub status: String,
}

/// Response body for `GET /reservations/:id/transactions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    /// Payment attempts, newest first.
    pub data: Vec<TransactionDto>,
}
