//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    appointment_handler, auth_handler, catalog_handler, clinic_handler, consultation_handler,
    pet_handler, user_handler,
};
use crate::domain::{
    AppointmentResponse, AppointmentStatus, AuthRole, ClinicContactResponse,
    ClinicDetailResponse, ClinicLocationResponse, ClinicResponse, ConsultationDetailResponse,
    ConsultationHistoryEntry, ConsultationHistoryResponse, ConsultationResponse,
    OperatingHoursResponse, PetResponse, ScheduleAppointmentRequest, ServiceResponse,
    ServiceTypeResponse, UserResponse,
};
use crate::errors::{ErrorBody, ErrorResponse, FieldError};
use crate::services::TokenResponse;
use crate::types::{
    AppointmentList, ClinicPage, PaginationMeta, PetList, ServiceList, ServiceTypeList,
};

/// OpenAPI documentation for the VetManager API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VetManager API",
        version = "0.1.0",
        description = "Pet owners book appointments at veterinary clinics; clinics publish their hours and services",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register_user,
        auth_handler::login_user,
        auth_handler::register_clinic,
        auth_handler::login_clinic,
        // Users
        user_handler::get_current_user,
        // Clinics
        clinic_handler::list_clinics,
        clinic_handler::get_clinic,
        clinic_handler::update_clinic,
        clinic_handler::delete_clinic,
        clinic_handler::add_operating_hours,
        clinic_handler::add_services,
        clinic_handler::save_location,
        clinic_handler::list_clinic_appointments,
        // Pets
        pet_handler::list_pets,
        pet_handler::create_pet,
        pet_handler::get_pet,
        pet_handler::update_pet,
        pet_handler::delete_pet,
        // Catalog
        catalog_handler::list_services,
        catalog_handler::create_service,
        catalog_handler::list_service_types,
        catalog_handler::create_service_type,
        // Appointments
        appointment_handler::schedule_appointment,
        appointment_handler::list_appointments,
        appointment_handler::get_appointment,
        appointment_handler::cancel_appointment,
        appointment_handler::complete_appointment,
        // Consultations
        consultation_handler::create_consultation,
        consultation_handler::pet_history,
        consultation_handler::get_consultation,
    ),
    components(
        schemas(
            // Errors
            ErrorResponse,
            ErrorBody,
            FieldError,
            // Domain types
            AuthRole,
            AppointmentStatus,
            UserResponse,
            ClinicResponse,
            ClinicDetailResponse,
            ClinicLocationResponse,
            ClinicContactResponse,
            OperatingHoursResponse,
            PetResponse,
            ServiceResponse,
            ServiceTypeResponse,
            AppointmentResponse,
            ScheduleAppointmentRequest,
            ConsultationResponse,
            ConsultationDetailResponse,
            ConsultationHistoryEntry,
            ConsultationHistoryResponse,
            TokenResponse,
            // Collections
            PaginationMeta,
            ClinicPage,
            AppointmentList,
            PetList,
            ServiceList,
            ServiceTypeList,
            // Request bodies
            auth_handler::RegisterUserRequest,
            auth_handler::LoginUserRequest,
            auth_handler::RegisterClinicRequest,
            auth_handler::LoginClinicRequest,
            clinic_handler::UpdateClinicRequest,
            clinic_handler::OperatingHoursRequest,
            clinic_handler::OperatingHoursEntry,
            clinic_handler::LinkServicesRequest,
            clinic_handler::ClinicLocationRequest,
            consultation_handler::CreateConsultationRequest,
            pet_handler::CreatePetRequest,
            pet_handler::UpdatePetRequest,
            catalog_handler::CreateServiceRequest,
            catalog_handler::CreateServiceTypeRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login for users and clinics"),
        (name = "Users", description = "Pet owner profile"),
        (name = "Clinics", description = "Clinic profiles, opening hours, locations and offered services"),
        (name = "Pets", description = "Pets of the authenticated owner"),
        (name = "Catalog", description = "Services and service types"),
        (name = "Appointments", description = "Appointment booking workflow"),
        (name = "Consultations", description = "Medical history of the authenticated owner's pets")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT obtained from /users/login or /clinicas/login",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/agendamentos"));
        assert!(paths.contains_key("/agendamentos/{id}/cancelar"));
        assert!(paths.contains_key("/clinicas/{id}"));
        assert!(paths.contains_key("/users/login"));
    }

    #[test]
    fn test_document_lists_consultation_and_location_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/consultas"));
        assert!(paths.contains_key("/consultas/pet/{id_pet}"));
        assert!(paths.contains_key("/consultas/{id}"));
        assert!(paths.contains_key("/clinicas/localizacao"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
