//! Data Transfer Objects for REST request/response serialization.
//!
//! All monetary amounts are integers in minor currency units; the API
//! never carries floating-point money.

pub mod availability_dto;
pub mod blackout_dto;
pub mod common_dto;
pub mod court_dto;
pub mod payment_dto;
pub mod reservation_dto;

pub use availability_dto::*;
pub use blackout_dto::*;
pub use common_dto::*;
pub use court_dto::*;
pub use payment_dto::*;
pub use reservation_dto::*;
