//! External payment gateway integration.
//!
//! The booking core never assumes the gateway is synchronous or
//! reliable: every call is fallible and retryable, and status updates
//! arrive either by callback push or by polling pull. Both transports
//! feed the same idempotent reconciliation handler in the payment
//! service.

pub mod http;

use std::fmt;

use async_trait::async_trait;

pub use http::HttpPaymentGateway;

use crate::domain::PaymentState;
use crate::error::BookingError;

/// A debt to register with the gateway.
#[derive(Debug, Clone)]
pub struct DebtRequest {
    /// Amount to collect, minor currency units.
    pub amount: i64,
    /// Human-readable description shown on the payment page.
    pub description: String,
    /// Payer email for gateway receipts, if known.
    pub client_email: Option<String>,
}

/// What the gateway returned for a registered debt.
///
/// At least one of `redirect_url` / `qr_url` is expected; the gateway
/// may return both.
#[derive(Debug, Clone)]
pub struct DebtRegistration {
    /// Gateway-side transaction reference, used for reconciliation.
    pub external_ref: String,
    /// Hosted card form URL.
    pub redirect_url: Option<String>,
    /// QR asset URL.
    pub qr_url: Option<String>,
    /// Initial payment state as reported by the gateway.
    pub initial_status: PaymentState,
}

/// Capability the payment service depends on.
///
/// Object-safe so the service can hold `Arc<dyn PaymentGateway>` and
/// tests can substitute an in-memory double.
#[async_trait]
pub trait PaymentGateway: Send + Sync + fmt::Debug {
    /// Registers a payable debt and returns the gateway's handles.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Gateway`] on transport failure, timeout,
    /// or a non-success gateway response.
    async fn register_debt(&self, request: &DebtRequest)
    -> Result<DebtRegistration, BookingError>;

    /// Looks up the current payment state by gateway reference.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Gateway`] on transport failure, timeout,
    /// or a non-success gateway response.
    async fn fetch_status(&self, external_ref: &str) -> Result<PaymentState, BookingError>;
}

/// Maps a gateway status string onto a [`PaymentState`].
///
/// Only definitive rejections become `Failed`; any unrecognised or
/// ambiguous status stays `Pending` so an unresolved payment is never
/// mistaken for a failed one.
#[must_use]
pub fn parse_gateway_status(raw: &str) -> PaymentState {
    match raw.to_ascii_lowercase().as_str() {
        "paid" | "approved" | "captured" => PaymentState::Paid,
        "failed" | "rejected" | "declined" => PaymentState::Failed,
        _ => PaymentState::Pending,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn recognised_paid_statuses() {
        for raw in ["paid", "PAID", "Approved", "captured"] {
            assert_eq!(parse_gateway_status(raw), PaymentState::Paid);
        }
    }

    #[test]
    fn recognised_failures() {
        for raw in ["failed", "rejected", "DECLINED"] {
            assert_eq!(parse_gateway_status(raw), PaymentState::Failed);
        }
    }

    #[test]
    fn ambiguous_statuses_stay_pending() {
        for raw in ["pending", "processing", "in_review", "", "garbage"] {
            assert_eq!(parse_gateway_status(raw), PaymentState::Pending);
        }
    }
}
