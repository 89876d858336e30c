//! Unit of Work: one place to reach every repository.
//!
//! Services depend on the [`UnitOfWork`] trait so tests can hand them
//! mocks or in-memory stores instead of a database.
//!
//! Multi-row writes that must be atomic open their own transaction inside
//! the store; the booking workflow relies on the partial unique index on
//! scheduled slots rather than an application-level transaction.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AppointmentRepository, AppointmentStore, CatalogRepository, CatalogStore, ClinicRepository,
    ClinicStore, ConsultationRepository, ConsultationStore, PetRepository, PetStore,
    UserRepository, UserStore,
};

/// Repository registry for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn clinics(&self) -> Arc<dyn ClinicRepository>;

    fn pets(&self) -> Arc<dyn PetRepository>;

    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    fn appointments(&self) -> Arc<dyn AppointmentRepository>;

    fn consultations(&self) -> Arc<dyn ConsultationRepository>;
}

/// Concrete implementation of UnitOfWork
#[derive(Clone)]
pub struct Persistence {
    users: Arc<dyn UserRepository>,
    clinics: Arc<dyn ClinicRepository>,
    pets: Arc<dyn PetRepository>,
    catalog: Arc<dyn CatalogRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    consultations: Arc<dyn ConsultationRepository>,
}

impl Persistence {
    /// Build SeaORM-backed repositories sharing one connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            clinics: Arc::new(ClinicStore::new(db.clone())),
            pets: Arc::new(PetStore::new(db.clone())),
            catalog: Arc::new(CatalogStore::new(db.clone())),
            appointments: Arc::new(AppointmentStore::new(db.clone())),
            consultations: Arc::new(ConsultationStore::new(db)),
        }
    }

    /// Assemble from arbitrary repository implementations
    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        clinics: Arc<dyn ClinicRepository>,
        pets: Arc<dyn PetRepository>,
        catalog: Arc<dyn CatalogRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        consultations: Arc<dyn ConsultationRepository>,
    ) -> Self {
        Self {
            users,
            clinics,
            pets,
            catalog,
            appointments,
            consultations,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicRepository> {
        self.clinics.clone()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.pets.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }

    fn consultations(&self) -> Arc<dyn ConsultationRepository> {
        self.consultations.clone()
    }
}
