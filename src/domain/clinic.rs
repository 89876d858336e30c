//! Clinic accounts, their opening hours and offered services.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::ServiceResponse;
use super::format_time_slot;
use crate::config::MAX_WEEKDAY;
use crate::errors::FieldError;

/// Clinic domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: i32,
    pub name: String,
    /// Tax id (CNPJ)
    pub cnpj: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub rating: f64,
    pub rating_count: i32,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClinic {
    pub name: String,
    pub cnpj: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub password_hash: String,
}

/// Profile fields a clinic may change on itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

/// Opening window of a clinic on one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub id: i32,
    pub clinic_id: i32,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: i16,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOperatingHours {
    pub clinic_id: i32,
    pub weekday: i16,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl NewOperatingHours {
    /// Check weekday range and that the window is not empty.
    ///
    /// `index` is the entry position in the request, used to name the
    /// offending field.
    pub fn check(&self, index: usize) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !(0..=MAX_WEEKDAY).contains(&self.weekday) {
            errors.push(FieldError::new(
                format!("horarios[{}].dia_semana", index),
                format!("dia_semana must be between 0 and {}", MAX_WEEKDAY),
            ));
        }
        if self.opens_at >= self.closes_at {
            errors.push(FieldError::new(
                format!("horarios[{}].horario_fim", index),
                "horario_fim must be after horario_inicio",
            ));
        }
        errors
    }
}

/// Street address and coordinates of a clinic
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicLocation {
    pub id: i32,
    pub clinic_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    /// Brazilian postal code (CEP)
    pub postal_code: String,
    pub updated_at: DateTime<Utc>,
}

/// Replaces any location the clinic already has
#[derive(Debug, Clone, PartialEq)]
pub struct NewClinicLocation {
    pub clinic_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Public clinic representation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Clínica Vida Animal")]
    pub nome: String,
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,
    pub foto: Option<String>,
    #[schema(example = 4.5)]
    pub avaliacao: f64,
    #[schema(example = 12)]
    pub total_avaliacoes: i32,
}

impl From<Clinic> for ClinicResponse {
    fn from(clinic: Clinic) -> Self {
        Self {
            id: clinic.id,
            nome: clinic.name,
            cnpj: clinic.cnpj,
            telefone: clinic.phone,
            foto: clinic.photo_url,
            avaliacao: clinic.rating,
            total_avaliacoes: clinic.rating_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OperatingHoursResponse {
    pub id: i32,
    #[schema(example = 1)]
    pub dia_semana: i16,
    #[schema(example = "08:00")]
    pub horario_inicio: String,
    #[schema(example = "18:00")]
    pub horario_fim: String,
}

impl From<OperatingHours> for OperatingHoursResponse {
    fn from(hours: OperatingHours) -> Self {
        Self {
            id: hours.id,
            dia_semana: hours.weekday,
            horario_inicio: format_time_slot(hours.opens_at),
            horario_fim: format_time_slot(hours.closes_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicLocationResponse {
    #[schema(example = -23.5614)]
    pub latitude: f64,
    #[schema(example = -46.6559)]
    pub longitude: f64,
    #[schema(example = "Av. Paulista, 1000")]
    pub endereco: String,
    #[schema(example = "São Paulo")]
    pub cidade: String,
    #[schema(example = "SP")]
    pub estado: String,
    #[schema(example = "01310-100")]
    pub cep: String,
}

impl From<ClinicLocation> for ClinicLocationResponse {
    fn from(location: ClinicLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            endereco: location.address,
            cidade: location.city,
            estado: location.state,
            cep: location.postal_code,
        }
    }
}

/// Clinic with its schedule, offered services and location
#[derive(Debug, Clone)]
pub struct ClinicProfile {
    pub clinic: Clinic,
    pub hours: Vec<OperatingHours>,
    pub services: Vec<super::Service>,
    pub location: Option<ClinicLocation>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClinicDetailResponse {
    #[serde(flatten)]
    pub clinica: ClinicResponse,
    pub horarios: Vec<OperatingHoursResponse>,
    pub servicos: Vec<ServiceResponse>,
    /// `null` until the clinic registers its address
    pub localizacao: Option<ClinicLocationResponse>,
}

impl From<ClinicProfile> for ClinicDetailResponse {
    fn from(profile: ClinicProfile) -> Self {
        Self {
            clinica: profile.clinic.into(),
            horarios: profile.hours.into_iter().map(Into::into).collect(),
            servicos: profile.services.into_iter().map(Into::into).collect(),
            localizacao: profile.location.map(Into::into),
        }
    }
}
