//! Service layer: booking orchestration and payment reconciliation.

pub mod booking_service;
pub mod payment_service;

pub use booking_service::{BookingService, CreateReservation};
pub use payment_service::PaymentService;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    //! Full booking flow across both services.

    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::{
        BlackoutStore, CancellationPolicy, ClientId, Court, CourtDirectory, CourtId, EventBus,
        OperatingHours, PaymentState, ReservationState, ReservationStore, TimeRange,
        TransactionLedger,
    };
    use crate::error::BookingError;
    use crate::gateway::{DebtRegistration, DebtRequest, PaymentGateway};

    /// Gateway double that accepts every debt and reports it paid.
    #[derive(Debug)]
    struct AlwaysPaysGateway;

    #[async_trait]
    impl PaymentGateway for AlwaysPaysGateway {
        async fn register_debt(
            &self,
            request: &DebtRequest,
        ) -> Result<DebtRegistration, BookingError> {
            Ok(DebtRegistration {
                external_ref: format!("gw-{}", request.amount),
                redirect_url: Some("https://gateway.test/pay".to_string()),
                qr_url: None,
                initial_status: PaymentState::Pending,
            })
        }

        async fn fetch_status(&self, _external_ref: &str) -> Result<PaymentState, BookingError> {
            Ok(PaymentState::Paid)
        }
    }

    fn services() -> (BookingService, PaymentService) {
        let reservations = Arc::new(ReservationStore::new());
        let event_bus = EventBus::new(1000);
        let booking = BookingService::new(
            Arc::new(CourtDirectory::new()),
            Arc::clone(&reservations),
            Arc::new(BlackoutStore::new()),
            CancellationPolicy::default(),
            event_bus.clone(),
        );
        let payments = PaymentService::new(
            Arc::new(AlwaysPaysGateway),
            reservations,
            Arc::new(TransactionLedger::new()),
            event_bus,
        );
        (booking, payments)
    }

    #[tokio::test]
    async fn book_pay_confirm_then_cancel_free() {
        let (booking, payments) = services();

        let court_id = booking
            .register_court(Court {
                id: CourtId::new(),
                venue_id: uuid::Uuid::new_v4(),
                name: "Centre Court".to_string(),
                hours: OperatingHours {
                    open_hour: 8,
                    close_hour: 22,
                },
                hourly_price: 15_000,
                active: true,
                registered_at: Utc::now(),
            })
            .await;

        // Book a two-hour interval far in the future.
        let Some(start) = Utc.with_ymd_and_hms(2099, 6, 1, 14, 0, 0).single() else {
            panic!("valid start");
        };
        let Ok(range) = TimeRange::new(start, start + Duration::hours(2)) else {
            panic!("valid range");
        };
        let Ok(reservation) = booking
            .create_reservation(CreateReservation {
                client_id: ClientId::new(),
                court_id,
                range,
                party_size: 4,
                extra_amount: 1_000,
            })
            .await
        else {
            panic!("creation failed");
        };
        assert_eq!(reservation.total_amount, 31_000);

        // Pay: register the debt, then reconcile via polling.
        let Ok(tx) = payments.register_payment(reservation.id, None).await else {
            panic!("registration failed");
        };
        assert_eq!(tx.state, PaymentState::Pending);
        let Ok(tx) = payments.sync_payment(reservation.id).await else {
            panic!("sync failed");
        };
        assert_eq!(tx.state, PaymentState::Paid);

        let Ok(confirmed) = booking.get_reservation(reservation.id).await else {
            panic!("get failed");
        };
        assert_eq!(confirmed.state, ReservationState::Confirmed);

        // The booked slots read unavailable.
        let Ok(slots) = booking.availability(court_id, start.date_naive()).await else {
            panic!("availability failed");
        };
        assert_eq!(slots.iter().filter(|s| !s.available).count(), 2);

        // Cancel well before start: free, and the interval reopens.
        let Ok((cancelled, quote)) = booking
            .cancel_reservation(reservation.id, None, start - Duration::days(2))
            .await
        else {
            panic!("cancellation failed");
        };
        assert_eq!(cancelled.state, ReservationState::Cancelled);
        assert_eq!(quote.fee_amount, 0);

        let Ok(slots) = booking.availability(court_id, start.date_naive()).await else {
            panic!("availability failed");
        };
        assert!(slots.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn paying_twice_is_rejected_after_confirmation() {
        let (booking, payments) = services();
        let court_id = booking
            .register_court(Court {
                id: CourtId::new(),
                venue_id: uuid::Uuid::new_v4(),
                name: "Court 2".to_string(),
                hours: OperatingHours {
                    open_hour: 0,
                    close_hour: 24,
                },
                hourly_price: 10_000,
                active: true,
                registered_at: Utc::now(),
            })
            .await;

        let Some(start) = Utc.with_ymd_and_hms(2099, 6, 1, 10, 0, 0).single() else {
            panic!("valid start");
        };
        let Ok(range) = TimeRange::new(start, start + Duration::hours(1)) else {
            panic!("valid range");
        };
        let Ok(reservation) = booking
            .create_reservation(CreateReservation {
                client_id: ClientId::new(),
                court_id,
                range,
                party_size: 2,
                extra_amount: 0,
            })
            .await
        else {
            panic!("creation failed");
        };

        let Ok(_) = payments.register_payment(reservation.id, None).await else {
            panic!("registration failed");
        };
        let Ok(_) = payments.sync_payment(reservation.id).await else {
            panic!("sync failed");
        };

        // A second debt registration against a confirmed reservation is
        // a state error, not a silent double charge.
        let result = payments.register_payment(reservation.id, None).await;
        assert!(matches!(
            result,
            Err(BookingError::ForbiddenTransition { .. })
        ));
    }
}
