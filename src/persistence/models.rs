//! Database models for the event log and cancellation audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored event row from the `booking_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Reservation the event concerns, if any (blackout events carry
    /// none).
    pub reservation_id: Option<Uuid>,
    /// Event type discriminator (e.g. `"reservation_confirmed"`).
    pub event_type: String,
    /// JSONB payload with event-specific data.
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A cancellation audit row from the `cancellations` table.
///
/// Fee settlement happens downstream; this table is the durable record
/// it settles from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// Auto-increment row ID.
    pub id: i64,
    /// Cancelled reservation.
    pub reservation_id: Uuid,
    /// Client the booking belonged to.
    pub client_id: Uuid,
    /// Fee charged, minor currency units (zero outside the cutoff).
    pub fee_amount: i64,
    /// Caller-supplied reason, if any.
    pub reason: Option<String>,
    /// Cancellation timestamp.
    pub cancelled_at: DateTime<Utc>,
}
