//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AppointmentRepository, AppointmentStore, CatalogRepository, CatalogStore, ClinicRepository,
    ClinicStore, ConsultationRepository, ConsultationStore, PetRepository, PetStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAppointmentRepository, MockCatalogRepository, MockClinicRepository,
    MockConsultationRepository, MockPetRepository, MockUserRepository,
};
