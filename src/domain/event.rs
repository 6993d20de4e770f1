//! Domain events reflecting booking state mutations.
//!
//! Every state change emits a [`BookingEvent`] through the
//! [`super::EventBus`]. Events feed the optional PostgreSQL event log and
//! any future notification consumers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::transaction::PaymentMethod;
use super::{BlackoutId, ClientId, CourtId, ReservationId, TransactionId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// Emitted when a reservation is created (Pending).
    ReservationCreated {
        /// Reservation identifier.
        reservation_id: ReservationId,
        /// Court booked.
        court_id: CourtId,
        /// Client who booked.
        client_id: ClientId,
        /// Interval start.
        start: DateTime<Utc>,
        /// Interval end.
        end: DateTime<Utc>,
        /// Total amount due, minor currency units.
        total_amount: i64,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted on the Pending → Confirmed transition (payment verified).
    ReservationConfirmed {
        /// Reservation identifier.
        reservation_id: ReservationId,
        /// Gateway reference of the paying transaction.
        external_ref: String,
        /// Confirmation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a client or administrator cancels a reservation.
    /// Doubles as the audit record for fee settlement.
    ReservationCancelled {
        /// Reservation identifier.
        reservation_id: ReservationId,
        /// Client the booking belonged to.
        client_id: ClientId,
        /// Fee charged, minor currency units (may be zero).
        fee_amount: i64,
        /// Caller-supplied reason, if any.
        reason: Option<String>,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the expiry sweep cancels a stale unpaid reservation.
    ReservationExpired {
        /// Reservation identifier.
        reservation_id: ReservationId,
        /// Expiry timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a debt is registered with the payment gateway.
    PaymentRegistered {
        /// Reservation the debt pays for.
        reservation_id: ReservationId,
        /// Ledger transaction identifier.
        transaction_id: TransactionId,
        /// Gateway-side reference.
        external_ref: String,
        /// Amount registered, minor currency units.
        amount: i64,
        /// Payment method the gateway issued handles for.
        method: PaymentMethod,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the gateway definitively rejects a transaction.
    /// The reservation stays Pending and payment may be retried.
    PaymentFailed {
        /// Reservation the attempt was for.
        reservation_id: ReservationId,
        /// Gateway-side reference.
        external_ref: String,
        /// Failure timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a court owner creates a blackout window.
    BlackoutCreated {
        /// Blackout identifier.
        blackout_id: BlackoutId,
        /// Court the window applies to.
        court_id: CourtId,
        /// Window start.
        start: DateTime<Utc>,
        /// Window end.
        end: DateTime<Utc>,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a blackout window is deleted.
    BlackoutDeleted {
        /// Blackout identifier.
        blackout_id: BlackoutId,
        /// Court the window applied to.
        court_id: CourtId,
        /// Deletion timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    /// Returns the reservation ID this event concerns, if any
    /// (blackout events carry none).
    #[must_use]
    pub fn reservation_id(&self) -> Option<ReservationId> {
        match self {
            Self::ReservationCreated { reservation_id, .. }
            | Self::ReservationConfirmed { reservation_id, .. }
            | Self::ReservationCancelled { reservation_id, .. }
            | Self::ReservationExpired { reservation_id, .. }
            | Self::PaymentRegistered { reservation_id, .. }
            | Self::PaymentFailed { reservation_id, .. } => Some(*reservation_id),
            Self::BlackoutCreated { .. } | Self::BlackoutDeleted { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ReservationCreated { .. } => "reservation_created",
            Self::ReservationConfirmed { .. } => "reservation_confirmed",
            Self::ReservationCancelled { .. } => "reservation_cancelled",
            Self::ReservationExpired { .. } => "reservation_expired",
            Self::PaymentRegistered { .. } => "payment_registered",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::BlackoutCreated { .. } => "blackout_created",
            Self::BlackoutDeleted { .. } => "blackout_deleted",
        }
    }
}
