//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CancellationRecord, StoredEvent};
use crate::error::BookingError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct BookingPersistence {
    pool: PgPool,
}

impl BookingPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    pub async fn save_event(
        &self,
        reservation_id: Option<Uuid>,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, BookingError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO booking_events (reservation_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(reservation_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(row)
    }

    /// Records a cancellation in the fee audit table.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    pub async fn save_cancellation(
        &self,
        reservation_id: Uuid,
        client_id: Uuid,
        fee_amount: i64,
        reason: Option<&str>,
        cancelled_at: DateTime<Utc>,
    ) -> Result<i64, BookingError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO cancellations (reservation_id, client_id, fee_amount, reason, cancelled_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(reservation_id)
        .bind(client_id)
        .bind(fee_amount)
        .bind(reason)
        .bind(cancelled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(row)
    }

    /// Loads events after the given timestamp, optionally filtered by
    /// reservation ID.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        reservation_id: Option<Uuid>,
    ) -> Result<Vec<StoredEvent>, BookingError> {
        let rows = if let Some(rid) = reservation_id {
            sqlx::query_as::<_, (i64, Option<Uuid>, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, reservation_id, event_type, payload, created_at FROM booking_events \
                 WHERE created_at > $1 AND reservation_id = $2 ORDER BY created_at ASC",
            )
            .bind(after)
            .bind(rid)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, Option<Uuid>, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, reservation_id, event_type, payload, created_at FROM booking_events \
                 WHERE created_at > $1 ORDER BY created_at ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, reservation_id, event_type, payload, created_at)| StoredEvent {
                    id,
                    reservation_id,
                    event_type,
                    payload,
                    created_at,
                },
            )
            .collect())
    }

    /// Lists a client's cancellation audit rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    pub async fn list_cancellations(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<CancellationRecord>, BookingError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, Uuid, i64, Option<String>, DateTime<Utc>)>(
            "SELECT id, reservation_id, client_id, fee_amount, reason, cancelled_at \
             FROM cancellations WHERE client_id = $1 ORDER BY cancelled_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, reservation_id, client_id, fee_amount, reason, cancelled_at)| {
                    CancellationRecord {
                        id,
                        reservation_id,
                        client_id,
                        fee_amount,
                        reason,
                        cancelled_at,
                    }
                },
            )
            .collect())
    }

    /// Deletes event log rows older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    pub async fn delete_old_events(&self, before_days: u64) -> Result<u64, BookingError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM booking_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
