//! Booking service: orchestrates availability, reservations, and
//! blackouts, and emits events.
//!
//! Every mutation follows the pattern: validate against reference data →
//! apply the change through the owning store → emit events → return the
//! result.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::{
    AvailabilitySlot, Blackout, BlackoutId, BlackoutStore, BookingEvent, CancellationPolicy,
    CancellationQuote, ClientId, Court, CourtDirectory, CourtId, EventBus, Reservation,
    ReservationId, ReservationStore, TimeRange, compute_slots,
};
use crate::error::BookingError;

/// Parameters for creating a reservation.
///
/// `client_id` is the authenticated principal resolved upstream and
/// passed in explicitly.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    /// Client making the booking.
    pub client_id: ClientId,
    /// Court to book.
    pub court_id: CourtId,
    /// Requested interval.
    pub range: TimeRange,
    /// Number of players attending.
    pub party_size: u32,
    /// Extras on top of the court price, minor currency units.
    pub extra_amount: i64,
}

/// Orchestration layer for reservations, availability, and blackouts.
#[derive(Debug, Clone)]
pub struct BookingService {
    courts: Arc<CourtDirectory>,
    reservations: Arc<ReservationStore>,
    blackouts: Arc<BlackoutStore>,
    policy: CancellationPolicy,
    event_bus: EventBus,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        courts: Arc<CourtDirectory>,
        reservations: Arc<ReservationStore>,
        blackouts: Arc<BlackoutStore>,
        policy: CancellationPolicy,
        event_bus: EventBus,
    ) -> Self {
        Self {
            courts,
            reservations,
            blackouts,
            policy,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the court directory.
    #[must_use]
    pub fn courts(&self) -> &Arc<CourtDirectory> {
        &self.courts
    }

    /// Returns a reference to the reservation store.
    #[must_use]
    pub fn reservations(&self) -> &Arc<ReservationStore> {
        &self.reservations
    }

    /// Computes the bookable slots for a court on a date.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CourtNotFound`] if the court is unknown.
    pub async fn availability(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, BookingError> {
        let court = self.courts.get(court_id).await?;
        let Some(window) = day_window(date) else {
            return Ok(Vec::new());
        };

        let blocking = self.reservations.blocking_ranges(court_id, &window).await;
        let blackouts = self.blackouts.ranges_overlapping(court_id, &window).await;

        Ok(compute_slots(&court, date, &blocking, &blackouts))
    }

    /// Creates a Pending reservation, re-validating availability at
    /// submission time.
    ///
    /// The overlap re-check against existing reservations runs atomically
    /// with the insert inside the store; a stale client-side slot list
    /// can therefore never produce a double booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CourtNotFound`] for an unknown court,
    /// [`BookingError::InvalidRequest`] for a malformed request, or
    /// [`BookingError::SlotConflict`] when the interval is taken.
    pub async fn create_reservation(
        &self,
        request: CreateReservation,
    ) -> Result<Reservation, BookingError> {
        let court = self.courts.get(request.court_id).await?;
        validate_reservation_request(&court, &request)?;

        let hours = request.range.whole_hours();
        let base_amount = court.hourly_price * hours;
        let reservation = Reservation::new(
            request.client_id,
            request.court_id,
            request.range,
            request.party_size,
            base_amount,
            request.extra_amount,
        );

        // Snapshot the owner's blackout windows just before the atomic
        // check-and-insert.
        let blackout_ranges = self
            .blackouts
            .ranges_overlapping(request.court_id, &request.range)
            .await;

        let id = self
            .reservations
            .insert_checked(reservation, &blackout_ranges)
            .await?;
        let created = self.reservations.get(id).await?;

        let _ = self.event_bus.publish(BookingEvent::ReservationCreated {
            reservation_id: created.id,
            court_id: created.court_id,
            client_id: created.client_id,
            start: created.range.start,
            end: created.range.end,
            total_amount: created.total_amount,
            timestamp: Utc::now(),
        });

        tracing::info!(
            reservation_id = %created.id,
            court_id = %created.court_id,
            start = %created.range.start,
            "reservation created"
        );
        Ok(created)
    }

    /// Returns a single reservation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] if the ID is unknown.
    pub async fn get_reservation(&self, id: ReservationId) -> Result<Reservation, BookingError> {
        self.reservations.get(id).await
    }

    /// Lists reservations, optionally filtered by court and/or client.
    pub async fn list_reservations(
        &self,
        court_id: Option<CourtId>,
        client_id: Option<ClientId>,
    ) -> Vec<Reservation> {
        self.reservations.list(court_id, client_id).await
    }

    /// Quotes the fee a cancellation at `now` would incur, without
    /// mutating anything. Lets the client see the fee before confirming.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] for an unknown ID or
    /// [`BookingError::ForbiddenTransition`] if the reservation is
    /// already terminal.
    pub async fn cancellation_quote(
        &self,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<CancellationQuote, BookingError> {
        let reservation = self.reservations.get(id).await?;
        let effective = reservation.effective_state(now);
        if effective.is_terminal() {
            return Err(BookingError::ForbiddenTransition {
                from: effective,
                to: crate::domain::ReservationState::Cancelled,
            });
        }
        Ok(self
            .policy
            .evaluate(reservation.total_amount, reservation.range.start, now))
    }

    /// Cancels a reservation and returns it with the fee charged.
    ///
    /// Allowed from Pending and Confirmed regardless of payment state;
    /// the fee is audit-only (settlement happens downstream from the
    /// emitted event).
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ReservationNotFound`] for an unknown ID or
    /// [`BookingError::ForbiddenTransition`] if the reservation is
    /// already terminal.
    pub async fn cancel_reservation(
        &self,
        id: ReservationId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Reservation, CancellationQuote), BookingError> {
        let cancelled = self.reservations.cancel(id, now).await?;
        let quote = self
            .policy
            .evaluate(cancelled.total_amount, cancelled.range.start, now);

        let _ = self.event_bus.publish(BookingEvent::ReservationCancelled {
            reservation_id: cancelled.id,
            client_id: cancelled.client_id,
            fee_amount: quote.fee_amount,
            reason,
            timestamp: now,
        });

        tracing::info!(
            reservation_id = %cancelled.id,
            fee_amount = quote.fee_amount,
            late = quote.late,
            "reservation cancelled"
        );
        Ok((cancelled, quote))
    }

    /// Cancels unpaid Pending reservations older than `ttl`, fee-free.
    /// Returns how many were expired. Run periodically by the sweep task.
    pub async fn expire_stale_pending(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let cutoff = now - ttl;
        let stale = self.reservations.stale_pending(cutoff).await;
        let mut expired = 0;

        for id in stale {
            match self.reservations.cancel(id, now).await {
                Ok(_) => {
                    let _ = self.event_bus.publish(BookingEvent::ReservationExpired {
                        reservation_id: id,
                        timestamp: now,
                    });
                    tracing::info!(reservation_id = %id, "stale pending reservation expired");
                    expired += 1;
                }
                // Confirmed or cancelled between the scan and the
                // transition; nothing to do.
                Err(_) => continue,
            }
        }
        expired
    }

    /// Creates a blackout window for a court.
    ///
    /// Overlapping blackouts are permitted; their effects union.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CourtNotFound`] for an unknown court or
    /// [`BookingError::InvalidRequest`] for an inactive one.
    pub async fn create_blackout(
        &self,
        court_id: CourtId,
        range: TimeRange,
        reason: Option<String>,
    ) -> Result<Blackout, BookingError> {
        let court = self.courts.get(court_id).await?;
        if !court.active {
            return Err(BookingError::InvalidRequest(format!(
                "court {court_id} is inactive"
            )));
        }

        let blackout = Blackout::new(court_id, range, reason);
        let id = self.blackouts.insert(blackout).await;
        let created = self.blackouts.get(id).await?;

        let _ = self.event_bus.publish(BookingEvent::BlackoutCreated {
            blackout_id: created.id,
            court_id,
            start: created.range.start,
            end: created.range.end,
            timestamp: Utc::now(),
        });

        tracing::info!(blackout_id = %created.id, court_id = %court_id, "blackout created");
        Ok(created)
    }

    /// Lists a court's blackout windows.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CourtNotFound`] if the court is unknown.
    pub async fn list_blackouts(&self, court_id: CourtId) -> Result<Vec<Blackout>, BookingError> {
        let _ = self.courts.get(court_id).await?;
        Ok(self.blackouts.list_for_court(court_id).await)
    }

    /// Deletes a blackout window.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BlackoutNotFound`] if the ID is unknown.
    pub async fn delete_blackout(&self, id: BlackoutId) -> Result<(), BookingError> {
        let removed = self.blackouts.delete(id).await?;

        let _ = self.event_bus.publish(BookingEvent::BlackoutDeleted {
            blackout_id: removed.id,
            court_id: removed.court_id,
            timestamp: Utc::now(),
        });

        tracing::info!(blackout_id = %removed.id, "blackout deleted");
        Ok(())
    }

    /// Registers (or re-syncs) a court in the directory.
    pub async fn register_court(&self, court: Court) -> CourtId {
        self.courts.register(court).await
    }
}

/// Start and end of `date` as a UTC window, for store queries.
fn day_window(date: NaiveDate) -> Option<TimeRange> {
    let start = date.and_hms_opt(0, 0, 0)?.and_utc();
    TimeRange::new(start, start + Duration::days(1)).ok()
}

/// Rejects malformed reservation requests before any state is touched.
fn validate_reservation_request(
    court: &Court,
    request: &CreateReservation,
) -> Result<(), BookingError> {
    if !court.active {
        return Err(BookingError::InvalidRequest(format!(
            "court {} is inactive",
            court.id
        )));
    }
    if request.party_size == 0 {
        return Err(BookingError::InvalidRequest(
            "party size must be at least 1".to_string(),
        ));
    }
    if request.extra_amount < 0 {
        return Err(BookingError::InvalidRequest(
            "extra amount must be non-negative".to_string(),
        ));
    }
    if !request.range.is_hour_aligned() {
        return Err(BookingError::InvalidRequest(
            "reservation must start and end on the hour".to_string(),
        ));
    }

    // The interval must fall inside the court's operating window on the
    // start date. With close <= open (misconfigured hours) nothing fits.
    let day = request.range.start.date_naive();
    let Some(midnight) = day.and_hms_opt(0, 0, 0) else {
        return Err(BookingError::InvalidRequest("invalid date".to_string()));
    };
    let open_at = midnight.and_utc() + Duration::hours(i64::from(court.hours.open_hour));
    let close_at = midnight.and_utc() + Duration::hours(i64::from(court.hours.close_hour.min(24)));
    if request.range.start < open_at || request.range.end > close_at {
        return Err(BookingError::InvalidRequest(format!(
            "interval is outside operating hours ({:02}:00–{:02}:00)",
            court.hours.open_hour, court.hours.close_hour
        )));
    }
    Ok(())
}
