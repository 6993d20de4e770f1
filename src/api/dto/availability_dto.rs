//! Availability query DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AvailabilitySlot, CourtId};

/// Query parameters for `GET /courts/:id/availability`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Date to query, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// Response body for `GET /courts/:id/availability`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Court queried.
    pub court_id: CourtId,
    /// Date queried.
    pub date: NaiveDate,
    /// One-hour slots across the court's operating window.
    pub slots: Vec<AvailabilitySlot>,
}
