//! Payment orchestration: debt registration and status reconciliation.
//!
//! Gateway status updates reach this service over two transports — the
//! callback webhook and the polling sync endpoint — and both funnel into
//! [`PaymentService::apply_gateway_status`], which is idempotent.
//! Duplicate or out-of-order deliveries therefore cannot double-confirm
//! a reservation or emit duplicate events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    BookingEvent, EventBus, PaymentMethod, PaymentState, PaymentTransaction, Reservation,
    ReservationId, ReservationState, ReservationStore, TransactionId, TransactionLedger,
};
use crate::error::BookingError;
use crate::gateway::{DebtRequest, PaymentGateway};

/// Orchestrates payment attempts and keeps reservations in sync with
/// gateway-reported outcomes.
#[derive(Debug, Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    reservations: Arc<ReservationStore>,
    ledger: Arc<TransactionLedger>,
    event_bus: EventBus,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        reservations: Arc<ReservationStore>,
        ledger: Arc<TransactionLedger>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            gateway,
            reservations,
            ledger,
            event_bus,
        }
    }

    /// Registers the reservation's total as a debt with the gateway and
    /// records the attempt in the ledger.
    ///
    /// A gateway failure leaves the reservation Pending and payable; the
    /// client may simply retry, and each retry becomes a fresh ledger
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] for an unknown
    /// reservation, [`BookingError::ForbiddenTransition`] if it is not
    /// awaiting payment, or [`BookingError::Gateway`] when registration
    /// fails upstream.
    pub async fn register_payment(
        &self,
        reservation_id: ReservationId,
        client_email: Option<String>,
    ) -> Result<PaymentTransaction, BookingError> {
        let now = Utc::now();
        let reservation = self.reservations.get(reservation_id).await?;

        let effective = reservation.effective_state(now);
        if effective != ReservationState::Pending {
            return Err(BookingError::ForbiddenTransition {
                from: effective,
                to: ReservationState::Confirmed,
            });
        }

        let request = DebtRequest {
            amount: reservation.total_amount,
            description: debt_description(&reservation),
            client_email,
        };
        let registration = self.gateway.register_debt(&request).await?;

        // QR-only registrations are QR payments; anything carrying a
        // redirect handle goes through the hosted card form.
        let method = if registration.redirect_url.is_none() && registration.qr_url.is_some() {
            PaymentMethod::Qr
        } else {
            PaymentMethod::CardRedirect
        };

        let transaction = PaymentTransaction {
            id: TransactionId::new(),
            reservation_id,
            external_ref: registration.external_ref.clone(),
            method,
            amount: reservation.total_amount,
            state: PaymentState::Pending,
            redirect_url: registration.redirect_url,
            qr_url: registration.qr_url,
            created_at: now,
            captured_at: None,
        };
        let transaction_id = self.ledger.insert(transaction).await;

        let _ = self.event_bus.publish(BookingEvent::PaymentRegistered {
            reservation_id,
            transaction_id,
            external_ref: registration.external_ref.clone(),
            amount: reservation.total_amount,
            method,
            timestamp: now,
        });
        tracing::info!(
            reservation_id = %reservation_id,
            external_ref = %registration.external_ref,
            amount = reservation.total_amount,
            "payment registered with gateway"
        );

        // Some gateway configurations settle synchronously and report a
        // terminal status straight from registration.
        if registration.initial_status == PaymentState::Pending {
            self.ledger
                .find_by_external_ref(&registration.external_ref)
                .await
        } else {
            self.apply_gateway_status(&registration.external_ref, registration.initial_status)
                .await
        }
    }

    /// Applies a gateway-reported status to the matching transaction and
    /// reservation. Safe to call any number of times with any ordering of
    /// reports.
    ///
    /// A `Paid` report confirms the reservation (once); a report for a
    /// reservation cancelled in the meantime never resurrects it. A
    /// `Failed` report leaves the reservation Pending so payment can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransactionNotFound`] if no transaction
    /// carries `external_ref`, or [`BookingError::ReservationNotFound`]
    /// if the ledger points at a reservation that no longer exists.
    pub async fn apply_gateway_status(
        &self,
        external_ref: &str,
        state: PaymentState,
    ) -> Result<PaymentTransaction, BookingError> {
        let now = Utc::now();
        let (transaction, tx_changed) = self.ledger.apply_state(external_ref, state, now).await?;

        match state {
            PaymentState::Paid => {
                let (reservation, confirmed) = self
                    .reservations
                    .confirm(transaction.reservation_id, now)
                    .await?;
                if confirmed {
                    let _ = self.event_bus.publish(BookingEvent::ReservationConfirmed {
                        reservation_id: reservation.id,
                        external_ref: external_ref.to_string(),
                        timestamp: now,
                    });
                    tracing::info!(
                        reservation_id = %reservation.id,
                        external_ref = %external_ref,
                        "reservation confirmed by payment"
                    );
                } else if reservation.state == ReservationState::Cancelled {
                    // Money arrived for a dead booking; flag it for
                    // manual refund handling.
                    tracing::warn!(
                        reservation_id = %reservation.id,
                        external_ref = %external_ref,
                        "payment captured for a cancelled reservation"
                    );
                }
            }
            PaymentState::Failed => {
                if tx_changed {
                    let _ = self.event_bus.publish(BookingEvent::PaymentFailed {
                        reservation_id: transaction.reservation_id,
                        external_ref: external_ref.to_string(),
                        timestamp: now,
                    });
                    tracing::info!(
                        reservation_id = %transaction.reservation_id,
                        external_ref = %external_ref,
                        "payment failed, reservation stays payable"
                    );
                }
            }
            PaymentState::Pending => {}
        }

        self.ledger.find_by_external_ref(external_ref).await
    }

    /// Polls the gateway for the reservation's authoritative transaction
    /// and reconciles the reported status. Fallback for lost callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransactionNotFound`] if the reservation
    /// has no payment attempts, or [`BookingError::Gateway`] when the
    /// status lookup fails upstream.
    pub async fn sync_payment(
        &self,
        reservation_id: ReservationId,
    ) -> Result<PaymentTransaction, BookingError> {
        let transaction = self.authoritative(reservation_id).await?;
        if transaction.state == PaymentState::Paid {
            return Ok(transaction);
        }

        let reported = self.gateway.fetch_status(&transaction.external_ref).await?;
        self.apply_gateway_status(&transaction.external_ref, reported)
            .await
    }

    /// Returns the authoritative transaction for a reservation without
    /// touching the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransactionNotFound`] if the reservation
    /// has no payment attempts.
    pub async fn payment_status(
        &self,
        reservation_id: ReservationId,
    ) -> Result<PaymentTransaction, BookingError> {
        self.authoritative(reservation_id).await
    }

    /// All payment attempts for a reservation, newest first.
    pub async fn list_transactions(
        &self,
        reservation_id: ReservationId,
    ) -> Vec<PaymentTransaction> {
        self.ledger.list_for_reservation(reservation_id).await
    }

    async fn authoritative(
        &self,
        reservation_id: ReservationId,
    ) -> Result<PaymentTransaction, BookingError> {
        self.ledger
            .authoritative_for_reservation(reservation_id)
            .await
            .ok_or_else(|| BookingError::TransactionNotFound(reservation_id.to_string()))
    }
}

/// Human-readable debt description shown on the gateway's payment page.
fn debt_description(reservation: &Reservation) -> String {
    format!(
        "Court booking {} — {}",
        reservation.id,
        reservation.range.start.format("%Y-%m-%d %H:%M UTC")
    )
}
