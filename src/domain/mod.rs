//! Domain layer: booking types, stores, and the event system.
//!
//! This module contains the reservation lifecycle model, the availability
//! engine, the cancellation fee policy, the in-memory stores (courts,
//! reservations, blackouts, payment transactions), and the event bus that
//! broadcasts state changes.

pub mod availability;
pub mod blackout;
pub mod blackout_store;
pub mod cancellation;
pub mod court;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod ledger;
pub mod reservation;
pub mod reservation_store;
pub mod time_range;
pub mod transaction;

pub use availability::{AvailabilitySlot, compute_slots};
pub use blackout::Blackout;
pub use blackout_store::BlackoutStore;
pub use cancellation::{CancellationPolicy, CancellationQuote};
pub use court::{Court, CourtDirectory, OperatingHours};
pub use event::BookingEvent;
pub use event_bus::EventBus;
pub use ids::{BlackoutId, ClientId, CourtId, ReservationId, TransactionId};
pub use ledger::TransactionLedger;
pub use reservation::{Reservation, ReservationState};
pub use reservation_store::ReservationStore;
pub use time_range::TimeRange;
pub use transaction::{PaymentMethod, PaymentState, PaymentTransaction};
