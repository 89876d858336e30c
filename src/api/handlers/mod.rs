//! HTTP request handlers.

pub mod appointment_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod clinic_handler;
pub mod consultation_handler;
pub mod pet_handler;
pub mod user_handler;

pub use appointment_handler::appointment_routes;
pub use auth_handler::{clinic_auth_routes, user_auth_routes};
pub use catalog_handler::{catalog_public_routes, catalog_routes};
pub use clinic_handler::{clinic_public_routes, clinic_routes};
pub use consultation_handler::consultation_routes;
pub use pet_handler::pet_routes;
pub use user_handler::user_routes;
