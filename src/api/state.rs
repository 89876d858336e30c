//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{
    AppointmentService, AuthService, CatalogService, ClinicService, ConsultationService,
    PetService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub clinic_service: Arc<dyn ClinicService>,
    pub pet_service: Arc<dyn PetService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub appointment_service: Arc<dyn AppointmentService>,
    pub consultation_service: Arc<dyn ConsultationService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state backed by the database.
    ///
    /// # Errors
    /// Fails when the token signing key is unusable.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection(), config)?;
        Ok(Self::from_container(&container, database))
    }

    /// Create application state from any service container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            clinic_service: container.clinics(),
            pet_service: container.pets(),
            catalog_service: container.catalog(),
            appointment_service: container.appointments(),
            consultation_service: container.consultations(),
            database,
        }
    }
}
