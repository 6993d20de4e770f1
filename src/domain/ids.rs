//! Type-safe identifiers for the booking domain.
//!
//! Each identifier is a newtype around a [`uuid::Uuid`] (v4) so that a
//! reservation ID can never be confused with a court or client ID at a
//! call site.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a court.
    ///
    /// Courts are reference data owned by the venue catalog; the booking
    /// core only ever reads them.
    CourtId
}

define_id! {
    /// Unique identifier for a reservation.
    ///
    /// Generated once at creation and immutable thereafter. Used as the
    /// key in the reservation store and as the event discriminator.
    ReservationId
}

define_id! {
    /// Identifier of the authenticated client a booking belongs to.
    ///
    /// Resolved by the upstream auth layer and passed in explicitly;
    /// the core never reads ambient session state.
    ClientId
}

define_id! {
    /// Unique identifier for an owner-defined blackout window.
    BlackoutId
}

define_id! {
    /// Unique identifier for a payment transaction attempt.
    TransactionId
}
