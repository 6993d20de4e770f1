//! # courtside
//!
//! Reservation and payment core for a sports-court booking marketplace.
//!
//! The service answers which one-hour slots are bookable, books them
//! without double-booking under concurrency, collects payment through an
//! external gateway, and applies the late-cancellation policy. Court
//! reference data is owned by the venue catalog and synced in; payment
//! capture is owned by the gateway and reconciled in.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)                 Payment Gateway (HTTP)
//!     │                              │
//!     ├── REST Handlers (api/)       │
//!     │                              │
//!     ├── BookingService ────┐   PaymentService (service/)
//!     │   (service/)         │       │
//!     │                      │       │
//!     ├── CourtDirectory     │   TransactionLedger (domain/)
//!     ├── ReservationStore   │       │
//!     ├── BlackoutStore      │   PaymentGateway trait (gateway/)
//!     │   (domain/)          │
//!     │                      │
//!     └── EventBus ──────────┴── PostgreSQL event log (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod persistence;
pub mod service;
