//! REST endpoint handlers organized by resource.

pub mod availability;
pub mod blackout;
pub mod court;
pub mod payment;
pub mod reservation;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(court::routes())
        .merge(availability::routes())
        .merge(reservation::routes())
        .merge(payment::routes())
        .merge(blackout::routes())
}
