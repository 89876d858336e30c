//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod appointment_service;
mod auth_service;
mod catalog_service;
mod clinic_service;
mod clock;
mod consultation_service;
pub mod container;
mod pet_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use appointment_service::{AppointmentManager, AppointmentService};
pub use auth_service::{AuthService, Authenticator, Claims, Identity, TokenIssuer, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use clinic_service::{ClinicManager, ClinicService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use consultation_service::{ConsultationManager, ConsultationService};
pub use pet_service::{PetManager, PetService};
pub use user_service::{UserManager, UserService};

// Parallel execution utilities
pub use container::parallel;
