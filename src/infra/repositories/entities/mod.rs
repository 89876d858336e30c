//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod clinic;
pub mod clinic_location;
pub mod clinic_service;
pub mod consultation;
pub mod operating_hours;
pub mod pet;
pub mod service;
pub mod service_type;
pub mod user;
