//! Payment transaction attempts against the external gateway.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ReservationId, TransactionId};

/// How the client pays the registered debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Client is redirected to the gateway's hosted card form.
    CardRedirect,
    /// Client scans a gateway-issued QR code.
    Qr,
}

/// Gateway-reported state of a transaction.
///
/// Ambiguous gateway answers (neither paid nor a definitive failure) stay
/// `Pending` — they are never treated as `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Registered, awaiting capture.
    Pending,
    /// Captured by the gateway.
    Paid,
    /// Definitively rejected by the gateway.
    Failed,
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One attempt to collect payment for a reservation.
///
/// A reservation may accumulate several attempts (retries after gateway
/// failures); the most recent non-failed one is authoritative for the
/// reservation's displayed payment status.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTransaction {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Reservation this attempt pays for.
    pub reservation_id: ReservationId,
    /// Gateway-side transaction reference, used for reconciliation.
    pub external_ref: String,
    /// Payment method the gateway issued handles for.
    pub method: PaymentMethod,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Current gateway-reported state.
    pub state: PaymentState,
    /// Hosted card form URL, if the gateway returned one.
    pub redirect_url: Option<String>,
    /// QR asset URL, if the gateway returned one.
    pub qr_url: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Capture timestamp, set when the state reaches `Paid`.
    pub captured_at: Option<DateTime<Utc>>,
}

impl PaymentTransaction {
    /// Records the gateway-reported state, stamping `captured_at` on the
    /// first transition to `Paid`. Returns `true` if the state changed.
    pub fn apply_state(&mut self, state: PaymentState, now: DateTime<Utc>) -> bool {
        if self.state == state {
            return false;
        }
        // A paid transaction is final; late "failed" reports are stale.
        if self.state == PaymentState::Paid {
            return false;
        }
        self.state = state;
        if state == PaymentState::Paid {
            self.captured_at = Some(now);
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_tx() -> PaymentTransaction {
        PaymentTransaction {
            id: TransactionId::new(),
            reservation_id: ReservationId::new(),
            external_ref: "gw-123".to_string(),
            method: PaymentMethod::CardRedirect,
            amount: 10_000,
            state: PaymentState::Pending,
            redirect_url: Some("https://gateway.test/pay/gw-123".to_string()),
            qr_url: None,
            created_at: Utc::now(),
            captured_at: None,
        }
    }

    #[test]
    fn apply_paid_stamps_capture_time() {
        let mut tx = make_tx();
        let now = Utc::now();
        assert!(tx.apply_state(PaymentState::Paid, now));
        assert_eq!(tx.state, PaymentState::Paid);
        assert_eq!(tx.captured_at, Some(now));
    }

    #[test]
    fn reapplying_same_state_is_noop() {
        let mut tx = make_tx();
        assert!(!tx.apply_state(PaymentState::Pending, Utc::now()));
    }

    #[test]
    fn paid_is_final() {
        let mut tx = make_tx();
        let now = Utc::now();
        assert!(tx.apply_state(PaymentState::Paid, now));
        assert!(!tx.apply_state(PaymentState::Failed, now));
        assert_eq!(tx.state, PaymentState::Paid);
    }

    #[test]
    fn failed_can_still_become_paid() {
        // Out-of-order delivery: a stale "failed" followed by "paid".
        let mut tx = make_tx();
        let now = Utc::now();
        assert!(tx.apply_state(PaymentState::Failed, now));
        assert!(tx.apply_state(PaymentState::Paid, now));
        assert_eq!(tx.state, PaymentState::Paid);
    }
}
