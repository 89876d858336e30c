//! Appointments and the booking request.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    format_date, format_time_slot, parse_date, parse_time_slot, Clinic, ClinicResponse, Pet,
    PetResponse, ServiceType, ServiceTypeResponse,
};
use crate::config::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_SCHEDULED};
use crate::errors::{collect_field_errors, AppError, AppResult, FieldError};

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static SLOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

/// Appointment lifecycle. Only `Scheduled` may transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => STATUS_SCHEDULED,
            AppointmentStatus::Cancelled => STATUS_CANCELLED,
            AppointmentStatus::Completed => STATUS_COMPLETED,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            STATUS_SCHEDULED => Some(AppointmentStatus::Scheduled),
            STATUS_CANCELLED => Some(AppointmentStatus::Cancelled),
            STATUS_COMPLETED => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    pub fn cancel(self) -> AppResult<Self> {
        self.transition(AppointmentStatus::Cancelled)
    }

    pub fn complete(self) -> AppResult<Self> {
        self.transition(AppointmentStatus::Completed)
    }

    fn transition(self, next: AppointmentStatus) -> AppResult<Self> {
        match self {
            AppointmentStatus::Scheduled => Ok(next),
            current => Err(AppError::invalid_state(format!(
                "Appointment is {} and can no longer change",
                current
            ))),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i32,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub status: AppointmentStatus,
    pub pet_id: i32,
    pub service_type_id: i32,
    pub clinic_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// A booking ready to persist. Always stored as `Scheduled`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub pet_id: i32,
    pub service_type_id: i32,
    pub clinic_id: i32,
    pub user_id: i32,
}

/// Booking request body.
///
/// Every field is required. Fields hold raw JSON so a missing or wrongly
/// typed value is reported per field alongside the others instead of
/// rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ScheduleAppointmentRequest {
    #[validate(required(message = "data_agendamento is required"))]
    #[schema(value_type = String, example = "2025-06-01")]
    pub data_agendamento: Option<Value>,

    #[validate(required(message = "horario_agendamento is required"))]
    #[schema(value_type = String, example = "10:00")]
    pub horario_agendamento: Option<Value>,

    #[validate(required(message = "id_tipo_servico is required"))]
    #[schema(value_type = i64, example = 2)]
    pub id_tipo_servico: Option<Value>,

    #[validate(required(message = "id_pet is required"))]
    #[schema(value_type = i64, example = 1)]
    pub id_pet: Option<Value>,

    #[validate(required(message = "id_clinica is required"))]
    #[schema(value_type = i64, example = 3)]
    pub id_clinica: Option<Value>,
}

/// A booking request that passed shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub service_type_id: i32,
    pub pet_id: i32,
    pub clinic_id: i32,
}

impl AppointmentDraft {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time_slot)
    }

    pub fn into_new(self, user_id: i32) -> NewAppointment {
        NewAppointment {
            date: self.date,
            time_slot: self.time_slot,
            pet_id: self.pet_id,
            service_type_id: self.service_type_id,
            clinic_id: self.clinic_id,
            user_id,
        }
    }
}

impl ScheduleAppointmentRequest {
    /// Requested start, when both date and slot are well formed.
    pub fn requested_at(&self) -> Option<NaiveDateTime> {
        let date = matching(&self.data_agendamento, &DATE_RE).and_then(parse_date)?;
        let slot = matching(&self.horario_agendamento, &SLOT_RE).and_then(parse_time_slot)?;
        Some(date.and_time(slot))
    }

    /// Check every field and report all violations at once.
    pub fn validate_draft(&self) -> Result<AppointmentDraft, Vec<FieldError>> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => collect_field_errors(&e),
        };

        let date_text = matching(&self.data_agendamento, &DATE_RE);
        // The pattern accepts impossible dates such as 2025-02-30
        let date = date_text.and_then(parse_date);
        if self.data_agendamento.is_some() {
            if date_text.is_none() {
                errors.push(FieldError::new(
                    "data_agendamento",
                    "data_agendamento must be a YYYY-MM-DD date",
                ));
            } else if date.is_none() {
                errors.push(FieldError::new(
                    "data_agendamento",
                    "data_agendamento is not a valid calendar date",
                ));
            }
        }

        let slot = matching(&self.horario_agendamento, &SLOT_RE).and_then(parse_time_slot);
        if self.horario_agendamento.is_some() && slot.is_none() {
            errors.push(FieldError::new(
                "horario_agendamento",
                "horario_agendamento must be HH:MM",
            ));
        }

        let ids = [
            ("id_tipo_servico", &self.id_tipo_servico),
            ("id_pet", &self.id_pet),
            ("id_clinica", &self.id_clinica),
        ];
        for (field, raw) in ids {
            if raw.is_some() && to_id(raw).is_none() {
                errors.push(FieldError::new(
                    field,
                    format!("{} must be a positive integer", field),
                ));
            }
        }

        match (
            date,
            slot,
            to_id(&self.id_tipo_servico),
            to_id(&self.id_pet),
            to_id(&self.id_clinica),
        ) {
            (Some(date), Some(time_slot), Some(service_type_id), Some(pet_id), Some(clinic_id))
                if errors.is_empty() =>
            {
                Ok(AppointmentDraft {
                    date,
                    time_slot,
                    service_type_id,
                    pet_id,
                    clinic_id,
                })
            }
            _ => {
                errors.sort_by(|a, b| a.field.cmp(&b.field));
                Err(errors)
            }
        }
    }
}

/// String value of a field, only when it matches `pattern`
fn matching<'a>(raw: &'a Option<Value>, pattern: &Regex) -> Option<&'a str> {
    raw.as_ref()
        .and_then(Value::as_str)
        .filter(|text| pattern.is_match(text))
}

fn to_id(raw: &Option<Value>) -> Option<i32> {
    raw.as_ref()
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .filter(|v| *v > 0)
}

/// Appointment with its pet, service type and clinic loaded
#[derive(Debug, Clone)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub pet: Pet,
    pub service_type: ServiceType,
    pub clinic: Clinic,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppointmentResponse {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "2025-06-01")]
    pub data_agendamento: String,
    #[schema(example = "10:00")]
    pub horario_agendamento: String,
    pub status: AppointmentStatus,
    #[schema(example = 7)]
    pub id_usuario: i32,
    pub pet: PetResponse,
    pub tipo_servico: ServiceTypeResponse,
    pub clinica: ClinicResponse,
    pub criado_em: DateTime<Utc>,
}

impl From<AppointmentDetails> for AppointmentResponse {
    fn from(details: AppointmentDetails) -> Self {
        let AppointmentDetails {
            appointment,
            pet,
            service_type,
            clinic,
        } = details;

        Self {
            id: appointment.id,
            data_agendamento: format_date(appointment.date),
            horario_agendamento: format_time_slot(appointment.time_slot),
            status: appointment.status,
            id_usuario: appointment.user_id,
            pet: pet.into(),
            tipo_servico: service_type.into(),
            clinica: clinic.into(),
            criado_em: appointment.created_at,
        }
    }
}
