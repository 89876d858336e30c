//! Clinic profile, opening hours, location and service offering handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    parse_time_slot, AppointmentResponse, AuthRole, ClinicDetailResponse, ClinicLocationResponse,
    ClinicResponse, ClinicUpdate, NewClinicLocation, NewOperatingHours, OperatingHoursResponse,
    ServiceResponse,
};
use crate::errors::{AppError, AppResult, ErrorResponse, FieldError};
use crate::services::Identity;
use crate::types::{
    AppointmentList, ClinicPage, Created, ListResponse, NoContent, Paginated, PaginationParams,
};

static CEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}-?\d{3}$").unwrap());

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClinicRequest {
    #[validate(length(min = 1, message = "nome must not be empty"))]
    pub nome: Option<String>,
    #[validate(length(min = 8, max = 20, message = "telefone must have 8 to 20 characters"))]
    pub telefone: Option<String>,
    #[validate(url(message = "foto must be a URL"))]
    pub foto: Option<String>,
}

/// One opening window
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperatingHoursEntry {
    /// 0 = Sunday .. 6 = Saturday
    #[schema(example = 1)]
    pub dia_semana: i16,
    #[schema(example = "08:00")]
    pub horario_inicio: String,
    #[schema(example = "18:00")]
    pub horario_fim: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OperatingHoursRequest {
    #[validate(length(min = 1, message = "horarios must not be empty"))]
    pub horarios: Vec<OperatingHoursEntry>,
}

impl OperatingHoursRequest {
    /// Parse every entry's times, naming each bad field by position.
    fn into_hours(self, clinic_id: i32) -> AppResult<Vec<NewOperatingHours>> {
        let mut errors = Vec::new();
        let mut hours = Vec::with_capacity(self.horarios.len());

        for (index, entry) in self.horarios.into_iter().enumerate() {
            let opens_at = parse_time_slot(&entry.horario_inicio);
            let closes_at = parse_time_slot(&entry.horario_fim);

            if opens_at.is_none() {
                errors.push(FieldError::new(
                    format!("horarios[{}].horario_inicio", index),
                    "horario_inicio must be HH:MM",
                ));
            }
            if closes_at.is_none() {
                errors.push(FieldError::new(
                    format!("horarios[{}].horario_fim", index),
                    "horario_fim must be HH:MM",
                ));
            }

            if let (Some(opens_at), Some(closes_at)) = (opens_at, closes_at) {
                hours.push(NewOperatingHours {
                    clinic_id,
                    weekday: entry.dia_semana,
                    opens_at,
                    closes_at,
                });
            }
        }

        if errors.is_empty() {
            Ok(hours)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LinkServicesRequest {
    /// Catalog service ids
    #[validate(length(min = 1, message = "servicos must not be empty"))]
    #[schema(example = json!([1, 2]))]
    pub servicos: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClinicLocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    #[schema(example = -23.5614)]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    #[schema(example = -46.6559)]
    pub longitude: f64,
    #[validate(length(min = 1, message = "endereco is required"))]
    #[schema(example = "Av. Paulista, 1000")]
    pub endereco: String,
    #[validate(length(min = 1, message = "cidade is required"))]
    #[schema(example = "São Paulo")]
    pub cidade: String,
    #[validate(length(min = 2, max = 32, message = "estado must have 2 to 32 characters"))]
    #[schema(example = "SP")]
    pub estado: String,
    #[validate(regex(path = *CEP_RE, message = "cep must be 8 digits, optionally as 00000-000"))]
    #[schema(example = "01310-100")]
    pub cep: String,
}

impl ClinicLocationRequest {
    fn into_location(self, clinic_id: i32) -> NewClinicLocation {
        NewClinicLocation {
            clinic_id,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.endereco,
            city: self.cidade,
            state: self.estado,
            postal_code: self.cep,
        }
    }
}

/// Public `/clinicas` routes
pub fn clinic_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clinics))
        .route("/:id", get(get_clinic))
}

/// Authenticated `/clinicas` routes
pub fn clinic_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", axum::routing::put(update_clinic).delete(delete_clinic))
        .route("/horarios", post(add_operating_hours))
        .route("/servicos", post(add_services))
        .route("/localizacao", post(save_location))
        .route("/me/agendamentos", get(list_clinic_appointments))
}

/// List clinics
#[utoipa::path(
    get,
    path = "/clinicas",
    tag = "Clinics",
    params(PaginationParams),
    responses((status = 200, description = "One page of clinics", body = ClinicPage))
)]
pub async fn list_clinics(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ClinicResponse>>> {
    let (clinics, total) = state.clinic_service.list_clinics(&params).await?;
    let data = clinics.into_iter().map(ClinicResponse::from).collect();

    Ok(Json(Paginated::new(data, params.page(), params.limit(), total)))
}

/// Get a clinic with its opening hours, services and location
#[utoipa::path(
    get,
    path = "/clinicas/{id}",
    tag = "Clinics",
    params(("id" = i32, Path, description = "Clinic id")),
    responses(
        (status = 200, description = "Clinic profile", body = ClinicDetailResponse),
        (status = 404, description = "Clinic not found", body = ErrorResponse)
    )
)]
pub async fn get_clinic(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ClinicDetailResponse>> {
    let profile = state.clinic_service.get_clinic(id).await?;
    Ok(Json(ClinicDetailResponse::from(profile)))
}

/// Update the caller's clinic
#[utoipa::path(
    put,
    path = "/clinicas/{id}",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Clinic id")),
    request_body = UpdateClinicRequest,
    responses(
        (status = 200, description = "Clinic updated", body = ClinicResponse),
        (status = 403, description = "Not the caller's clinic", body = ErrorResponse),
        (status = 404, description = "Clinic not found", body = ErrorResponse)
    )
)]
pub async fn update_clinic(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateClinicRequest>,
) -> AppResult<Json<ClinicResponse>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let changes = ClinicUpdate {
        name: payload.nome,
        phone: payload.telefone,
        photo_url: payload.foto,
    };
    let clinic = state
        .clinic_service
        .update_clinic(id, identity.id, changes)
        .await?;
    Ok(Json(ClinicResponse::from(clinic)))
}

/// Delete the caller's clinic
#[utoipa::path(
    delete,
    path = "/clinicas/{id}",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Clinic id")),
    responses(
        (status = 204, description = "Clinic deleted"),
        (status = 403, description = "Not the caller's clinic", body = ErrorResponse),
        (status = 404, description = "Clinic not found", body = ErrorResponse),
        (status = 422, description = "Clinic has appointments", body = ErrorResponse)
    )
)]
pub async fn delete_clinic(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    identity.require_role(&[AuthRole::Clinica])?;

    state.clinic_service.delete_clinic(id, identity.id).await?;
    Ok(NoContent)
}

/// Add opening hours to the caller's clinic
#[utoipa::path(
    post,
    path = "/clinicas/horarios",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    request_body = OperatingHoursRequest,
    responses(
        (status = 201, description = "Opening hours created", body = [OperatingHoursResponse]),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a clinic account", body = ErrorResponse)
    )
)]
pub async fn add_operating_hours(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<OperatingHoursRequest>,
) -> AppResult<Created<Vec<OperatingHoursResponse>>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let hours = payload.into_hours(identity.id)?;
    let created = state
        .clinic_service
        .add_operating_hours(identity.id, hours)
        .await?;

    Ok(Created(created.into_iter().map(Into::into).collect()))
}

/// Offer catalog services at the caller's clinic
#[utoipa::path(
    post,
    path = "/clinicas/servicos",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    request_body = LinkServicesRequest,
    responses(
        (status = 201, description = "Services now offered by the clinic", body = [ServiceResponse]),
        (status = 403, description = "Not a clinic account", body = ErrorResponse),
        (status = 404, description = "Unknown service", body = ErrorResponse)
    )
)]
pub async fn add_services(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<LinkServicesRequest>,
) -> AppResult<Created<Vec<ServiceResponse>>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let services = state
        .clinic_service
        .add_services(identity.id, payload.servicos)
        .await?;

    Ok(Created(services.into_iter().map(Into::into).collect()))
}

/// Set the address and coordinates of the caller's clinic
#[utoipa::path(
    post,
    path = "/clinicas/localizacao",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    request_body = ClinicLocationRequest,
    responses(
        (status = 201, description = "Location saved, replacing any earlier one", body = ClinicLocationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a clinic account", body = ErrorResponse),
        (status = 404, description = "Clinic not found", body = ErrorResponse)
    )
)]
pub async fn save_location(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<ClinicLocationRequest>,
) -> AppResult<Created<ClinicLocationResponse>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let location = state
        .clinic_service
        .save_location(payload.into_location(identity.id))
        .await?;
    Ok(Created(location.into()))
}

/// Appointments booked at the caller's clinic
#[utoipa::path(
    get,
    path = "/clinicas/me/agendamentos",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Appointments at the clinic", body = AppointmentList),
        (status = 403, description = "Not a clinic account", body = ErrorResponse)
    )
)]
pub async fn list_clinic_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ListResponse<AppointmentResponse>>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let appointments = state
        .appointment_service
        .list_for_clinic(identity.id)
        .await?;
    Ok(Json(appointments.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dia: i16, inicio: &str, fim: &str) -> OperatingHoursEntry {
        OperatingHoursEntry {
            dia_semana: dia,
            horario_inicio: inicio.to_string(),
            horario_fim: fim.to_string(),
        }
    }

    #[test]
    fn test_hours_parsed_for_caller() {
        let request = OperatingHoursRequest {
            horarios: vec![entry(1, "08:00", "18:00"), entry(6, "09:00", "12:30")],
        };
        let hours = request.into_hours(3).unwrap();
        assert_eq!(hours.len(), 2);
        assert!(hours.iter().all(|h| h.clinic_id == 3));
        assert_eq!(hours[1].closes_at.to_string(), "12:30:00");
    }

    #[test]
    fn test_unparseable_times_named_by_position() {
        let request = OperatingHoursRequest {
            horarios: vec![entry(1, "08:00", "18:00"), entry(2, "eight", "25:00")],
        };
        match request.into_hours(3) {
            Err(AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(
                    names,
                    vec!["horarios[1].horario_inicio", "horarios[1].horario_fim"]
                );
            }
            other => panic!("expected validation error, got {:?}", other.map(|h| h.len())),
        }
    }

    fn location_request(cep: &str, latitude: f64) -> ClinicLocationRequest {
        ClinicLocationRequest {
            latitude,
            longitude: -46.6559,
            endereco: "Av. Paulista, 1000".to_string(),
            cidade: "São Paulo".to_string(),
            estado: "SP".to_string(),
            cep: cep.to_string(),
        }
    }

    #[test]
    fn test_location_request_validation() {
        assert!(location_request("01310-100", -23.56).validate().is_ok());
        assert!(location_request("01310100", -23.56).validate().is_ok());

        let errors = location_request("1310-10", 91.0).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cep"));
        assert!(fields.contains_key("latitude"));
    }

    #[test]
    fn test_location_belongs_to_caller() {
        let location = location_request("01310-100", -23.56).into_location(3);
        assert_eq!(location.clinic_id, 3);
        assert_eq!(location.postal_code, "01310-100");
    }
}
