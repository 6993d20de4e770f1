//! Time-window cancellation fee policy.
//!
//! Cancellation itself is always allowed from a live reservation; this
//! policy only decides the fee. Inside the cutoff window (default 24h
//! before start) a percentage of the total amount is forfeited; outside
//! it the cancellation is free. The fee is informational/audit-only —
//! refund execution against the gateway is a separate settlement concern.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// What a cancellation at a given instant would cost.
#[derive(Debug, Clone, Copy, Serialize, utoipa::ToSchema)]
pub struct CancellationQuote {
    /// Fee in minor currency units (zero when outside the window).
    pub fee_amount: i64,
    /// Percentage applied (0 or `late_fee_percent`).
    pub fee_percent: u32,
    /// `true` when the cancellation falls inside the penalty window.
    pub late: bool,
}

/// Fee policy parameters, loaded from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct CancellationPolicy {
    /// Window before the reservation start inside which the fee applies.
    pub cutoff: Duration,
    /// Percentage of the total amount forfeited inside the window.
    pub late_fee_percent: u32,
}

impl CancellationPolicy {
    /// Policy with the given cutoff in hours and fee percentage.
    #[must_use]
    pub fn new(cutoff_hours: u64, late_fee_percent: u32) -> Self {
        Self {
            cutoff: Duration::hours(i64::try_from(cutoff_hours).unwrap_or(i64::MAX)),
            late_fee_percent,
        }
    }

    /// Evaluates the fee for cancelling at `now` a reservation of
    /// `total_amount` starting at `start`.
    ///
    /// The fee applies strictly inside the window: at exactly
    /// `start - now == cutoff` the cancellation is still free. A
    /// cancellation after the start instant is also "late" (the window
    /// extends through the reservation itself).
    #[must_use]
    pub fn evaluate(
        &self,
        total_amount: i64,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> CancellationQuote {
        let late = start - now < self.cutoff;
        if late {
            CancellationQuote {
                fee_amount: total_amount * i64::from(self.late_fee_percent) / 100,
                fee_percent: self.late_fee_percent,
                late: true,
            }
        } else {
            CancellationQuote {
                fee_amount: 0,
                fee_percent: 0,
                late: false,
            }
        }
    }
}

impl Default for CancellationPolicy {
    /// 24-hour cutoff, 50% fee.
    fn default() -> Self {
        Self::new(24, 50)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        let Some(t) = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).single() else {
            panic!("valid timestamp");
        };
        t
    }

    #[test]
    fn outside_window_is_free() {
        let policy = CancellationPolicy::default();
        let now = start() - Duration::hours(25);
        let quote = policy.evaluate(10_000, start(), now);
        assert_eq!(quote.fee_amount, 0);
        assert!(!quote.late);
    }

    #[test]
    fn inside_window_charges_half() {
        let policy = CancellationPolicy::default();
        let now = start() - Duration::hours(23);
        let quote = policy.evaluate(10_000, start(), now);
        assert_eq!(quote.fee_amount, 5_000);
        assert_eq!(quote.fee_percent, 50);
        assert!(quote.late);
    }

    #[test]
    fn exactly_at_cutoff_is_free() {
        let policy = CancellationPolicy::default();
        let now = start() - Duration::hours(24);
        let quote = policy.evaluate(10_000, start(), now);
        assert_eq!(quote.fee_amount, 0);
        assert!(!quote.late);
    }

    #[test]
    fn one_second_inside_cutoff_charges() {
        let policy = CancellationPolicy::default();
        let now = start() - Duration::hours(24) + Duration::seconds(1);
        let quote = policy.evaluate(10_000, start(), now);
        assert_eq!(quote.fee_amount, 5_000);
        assert!(quote.late);
    }

    #[test]
    fn after_start_is_still_late() {
        let policy = CancellationPolicy::default();
        let now = start() + Duration::minutes(10);
        let quote = policy.evaluate(10_000, start(), now);
        assert!(quote.late);
        assert_eq!(quote.fee_amount, 5_000);
    }

    #[test]
    fn fee_uses_integer_math() {
        let policy = CancellationPolicy::default();
        let now = start() - Duration::hours(1);
        let quote = policy.evaluate(10_001, start(), now);
        assert_eq!(quote.fee_amount, 5_000); // truncates, never rounds up
    }

    #[test]
    fn custom_policy_parameters() {
        let policy = CancellationPolicy::new(48, 25);
        let now = start() - Duration::hours(36);
        let quote = policy.evaluate(10_000, start(), now);
        assert_eq!(quote.fee_amount, 2_500);
        assert_eq!(quote.fee_percent, 25);
    }
}
