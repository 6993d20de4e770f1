//! Ledger of payment transaction attempts.
//!
//! Transactions are looked up two ways: by the gateway's external
//! reference (reconciliation path) and by reservation (display path).
//! The most recent non-failed attempt is authoritative for a
//! reservation's payment status.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::transaction::{PaymentState, PaymentTransaction};
use super::{ReservationId, TransactionId};
use crate::error::BookingError;

/// Central store for payment transactions.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    transactions: RwLock<HashMap<TransactionId, PaymentTransaction>>,
}

impl TransactionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new transaction attempt.
    pub async fn insert(&self, tx: PaymentTransaction) -> TransactionId {
        let id = tx.id;
        self.transactions.write().await.insert(id, tx);
        id
    }

    /// Finds the transaction carrying the given gateway reference.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransactionNotFound`] if no transaction
    /// carries the reference.
    pub async fn find_by_external_ref(
        &self,
        external_ref: &str,
    ) -> Result<PaymentTransaction, BookingError> {
        self.transactions
            .read()
            .await
            .values()
            .find(|tx| tx.external_ref == external_ref)
            .cloned()
            .ok_or_else(|| BookingError::TransactionNotFound(external_ref.to_string()))
    }

    /// Applies a gateway-reported state to the transaction with the given
    /// reference, under the write lock. Returns the updated transaction
    /// and whether its state changed.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TransactionNotFound`] if no transaction
    /// carries the reference.
    pub async fn apply_state(
        &self,
        external_ref: &str,
        state: PaymentState,
        now: DateTime<Utc>,
    ) -> Result<(PaymentTransaction, bool), BookingError> {
        let mut map = self.transactions.write().await;
        let tx = map
            .values_mut()
            .find(|tx| tx.external_ref == external_ref)
            .ok_or_else(|| BookingError::TransactionNotFound(external_ref.to_string()))?;
        let changed = tx.apply_state(state, now);
        Ok((tx.clone(), changed))
    }

    /// All attempts for a reservation, newest first.
    pub async fn list_for_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Vec<PaymentTransaction> {
        let map = self.transactions.read().await;
        let mut rows: Vec<PaymentTransaction> = map
            .values()
            .filter(|tx| tx.reservation_id == reservation_id)
            .cloned()
            .collect();
        rows.sort_by_key(|tx| std::cmp::Reverse(tx.created_at));
        rows
    }

    /// The authoritative attempt for a reservation: the most recent
    /// non-failed transaction, falling back to the most recent failed one
    /// when every attempt failed.
    pub async fn authoritative_for_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Option<PaymentTransaction> {
        let rows = self.list_for_reservation(reservation_id).await;
        rows.iter()
            .find(|tx| tx.state != PaymentState::Failed)
            .or_else(|| rows.first())
            .cloned()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::transaction::PaymentMethod;
    use chrono::Duration;

    fn make_tx(reservation_id: ReservationId, external_ref: &str) -> PaymentTransaction {
        PaymentTransaction {
            id: TransactionId::new(),
            reservation_id,
            external_ref: external_ref.to_string(),
            method: PaymentMethod::Qr,
            amount: 10_000,
            state: PaymentState::Pending,
            redirect_url: None,
            qr_url: Some(format!("https://gateway.test/qr/{external_ref}")),
            created_at: Utc::now(),
            captured_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_external_ref() {
        let ledger = TransactionLedger::new();
        let reservation = ReservationId::new();
        ledger.insert(make_tx(reservation, "gw-1")).await;

        let Ok(found) = ledger.find_by_external_ref("gw-1").await else {
            panic!("transaction not found");
        };
        assert_eq!(found.reservation_id, reservation);

        assert!(ledger.find_by_external_ref("gw-unknown").await.is_err());
    }

    #[tokio::test]
    async fn apply_state_updates_in_place() {
        let ledger = TransactionLedger::new();
        ledger.insert(make_tx(ReservationId::new(), "gw-1")).await;

        let Ok((tx, changed)) = ledger
            .apply_state("gw-1", PaymentState::Paid, Utc::now())
            .await
        else {
            panic!("apply failed");
        };
        assert!(changed);
        assert_eq!(tx.state, PaymentState::Paid);
        assert!(tx.captured_at.is_some());

        let Ok((_, changed)) = ledger
            .apply_state("gw-1", PaymentState::Paid, Utc::now())
            .await
        else {
            panic!("apply failed");
        };
        assert!(!changed);
    }

    #[tokio::test]
    async fn authoritative_prefers_non_failed() {
        let ledger = TransactionLedger::new();
        let reservation = ReservationId::new();

        let mut failed = make_tx(reservation, "gw-old");
        failed.state = PaymentState::Failed;
        failed.created_at = Utc::now() + Duration::seconds(10); // newest
        ledger.insert(failed).await;
        ledger.insert(make_tx(reservation, "gw-retry")).await;

        let Some(authoritative) = ledger.authoritative_for_reservation(reservation).await else {
            panic!("no transaction");
        };
        assert_eq!(authoritative.external_ref, "gw-retry");
    }

    #[tokio::test]
    async fn authoritative_falls_back_to_failed() {
        let ledger = TransactionLedger::new();
        let reservation = ReservationId::new();
        let mut failed = make_tx(reservation, "gw-1");
        failed.state = PaymentState::Failed;
        ledger.insert(failed).await;

        let Some(authoritative) = ledger.authoritative_for_reservation(reservation).await else {
            panic!("no transaction");
        };
        assert_eq!(authoritative.state, PaymentState::Failed);
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let ledger = TransactionLedger::new();
        let reservation = ReservationId::new();

        let mut older = make_tx(reservation, "gw-1");
        older.created_at = Utc::now() - Duration::minutes(5);
        ledger.insert(older).await;
        ledger.insert(make_tx(reservation, "gw-2")).await;
        ledger.insert(make_tx(ReservationId::new(), "gw-3")).await;

        let rows = ledger.list_for_reservation(reservation).await;
        assert_eq!(rows.len(), 2);
        let Some(first) = rows.first() else {
            panic!("no rows");
        };
        assert_eq!(first.external_ref, "gw-2");
    }
}
