//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod appointment;
pub mod catalog;
pub mod clinic;
pub mod consultation;
pub mod password;
pub mod pet;
pub mod role;
pub mod schedule;
pub mod user;

pub use appointment::{
    Appointment, AppointmentDetails, AppointmentDraft, AppointmentResponse, AppointmentStatus,
    NewAppointment, ScheduleAppointmentRequest,
};
pub use catalog::{
    NewService, NewServiceType, Service, ServiceResponse, ServiceType, ServiceTypeResponse,
};
pub use clinic::{
    Clinic, ClinicDetailResponse, ClinicLocation, ClinicLocationResponse, ClinicProfile,
    ClinicResponse, ClinicUpdate, NewClinic, NewClinicLocation, NewOperatingHours,
    OperatingHours, OperatingHoursResponse,
};
pub use consultation::{
    ClinicContactResponse, Consultation, ConsultationDetailResponse, ConsultationHistory,
    ConsultationHistoryEntry, ConsultationHistoryResponse, ConsultationRecord,
    ConsultationResponse, NewConsultation,
};
pub use password::Password;
pub use pet::{NewPet, Pet, PetResponse, PetUpdate};
pub use role::AuthRole;
pub use schedule::{
    format_date, format_time_slot, format_timestamp, parse_date, parse_time_slot, parse_timestamp,
};
pub use user::{NewUser, User, UserResponse};
