//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod appointment_repository;
mod catalog_repository;
mod clinic_repository;
mod consultation_repository;
pub(crate) mod entities;
mod pet_repository;
mod user_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore};
pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use clinic_repository::{ClinicRepository, ClinicStore};
pub use consultation_repository::{ConsultationRepository, ConsultationStore};
pub use pet_repository::{PetRepository, PetStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use clinic_repository::MockClinicRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use consultation_repository::MockConsultationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pet_repository::MockPetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
