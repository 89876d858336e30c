//! Appointment booking handlers.
//!
//! Pet owners book, list and cancel their appointments; clinics complete
//! the ones booked with them. The booking body is parsed without shape
//! validation so the workflow can report a past date ahead of field errors.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Extension, Router,
};

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{AppointmentResponse, AuthRole, ScheduleAppointmentRequest};
use crate::errors::{AppResult, ErrorResponse};
use crate::services::Identity;
use crate::types::{AppointmentList, Created, ListResponse};

/// Authenticated `/agendamentos` routes
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(schedule_appointment))
        .route("/:id", get(get_appointment))
        .route("/:id/cancelar", patch(cancel_appointment))
        .route("/:id/concluir", patch(complete_appointment))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/agendamentos",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = ScheduleAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Missing fields or past date", body = ErrorResponse),
        (status = 403, description = "Pet belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Pet, service type or clinic not found", body = ErrorResponse),
        (status = 409, description = "Slot already booked", body = ErrorResponse)
    )
)]
pub async fn schedule_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(payload): JsonBody<ScheduleAppointmentRequest>,
) -> AppResult<Created<AppointmentResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let details = state
        .appointment_service
        .schedule(payload, identity.id)
        .await?;
    Ok(Created(details.into()))
}

/// List the caller's appointments
#[utoipa::path(
    get,
    path = "/agendamentos",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's appointments", body = AppointmentList),
        (status = 403, description = "Not a user account", body = ErrorResponse)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ListResponse<AppointmentResponse>>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let appointments = state.appointment_service.list_for_user(identity.id).await?;
    Ok(Json(appointments.into_iter().collect()))
}

/// Get one of the caller's appointments
#[utoipa::path(
    get,
    path = "/agendamentos/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentResponse),
        (status = 403, description = "Booked by someone else", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let details = state.appointment_service.get_detail(id, identity.id).await?;
    Ok(Json(details.into()))
}

/// Cancel one of the caller's appointments
#[utoipa::path(
    patch,
    path = "/agendamentos/{id}/cancelar",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 403, description = "Booked by someone else", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
        (status = 422, description = "Appointment is not scheduled", body = ErrorResponse)
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let details = state.appointment_service.cancel(id, identity.id).await?;
    Ok(Json(details.into()))
}

/// Mark an appointment at the caller's clinic as completed
#[utoipa::path(
    patch,
    path = "/agendamentos/{id}/concluir",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentResponse),
        (status = 403, description = "Booked at another clinic", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
        (status = 422, description = "Appointment is not scheduled", body = ErrorResponse)
    )
)]
pub async fn complete_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let details = state.appointment_service.complete(id, identity.id).await?;
    Ok(Json(details.into()))
}
