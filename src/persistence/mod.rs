//! Persistence layer: PostgreSQL event log and cancellation audit.
//!
//! Durability is write-behind: the in-memory stores stay authoritative
//! and a background task drains the event bus into PostgreSQL, so a
//! database hiccup never blocks a booking.

pub mod models;
pub mod postgres;

pub use postgres::BookingPersistence;

use tokio::sync::broadcast;

use crate::domain::BookingEvent;

/// Drains the event bus into the PostgreSQL event log until the bus is
/// closed. Intended to be spawned as a background task.
///
/// Database failures are logged and skipped; lagged receivers drop the
/// overwritten events and keep going.
pub async fn run_event_log(
    persistence: BookingPersistence,
    mut receiver: broadcast::Receiver<BookingEvent>,
) {
    loop {
        let event = match receiver.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log receiver lagged, events dropped");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "event serialization failed");
                continue;
            }
        };
        let reservation_id = event.reservation_id().map(|id| *id.as_uuid());

        if let Err(e) = persistence
            .save_event(reservation_id, event.event_type_str(), &payload)
            .await
        {
            tracing::error!(error = %e, event_type = event.event_type_str(), "event log write failed");
        }

        // Cancellations additionally feed the fee audit table.
        if let BookingEvent::ReservationCancelled {
            reservation_id,
            client_id,
            fee_amount,
            ref reason,
            timestamp,
        } = event
        {
            if let Err(e) = persistence
                .save_cancellation(
                    *reservation_id.as_uuid(),
                    *client_id.as_uuid(),
                    fee_amount,
                    reason.as_deref(),
                    timestamp,
                )
                .await
            {
                tracing::error!(error = %e, reservation_id = %reservation_id, "cancellation audit write failed");
            }
        }
    }

    tracing::info!("event bus closed, event log task stopping");
}
