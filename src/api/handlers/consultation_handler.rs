//! Consultation record handlers. Only the pet owner reads or writes them.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    parse_timestamp, AuthRole, ConsultationDetailResponse, ConsultationHistoryResponse,
    NewConsultation,
};
use crate::errors::{AppError, AppResult, ErrorResponse};
use crate::services::Identity;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConsultationRequest {
    /// `YYYY-MM-DDTHH:MM[:SS]`, RFC 3339 or a bare date
    #[validate(length(min = 1, message = "data_consulta is required"))]
    #[schema(example = "2025-04-20T14:30:00")]
    pub data_consulta: String,
    #[validate(range(min = 1, message = "id_pet must be a positive integer"))]
    #[schema(example = 1)]
    pub id_pet: i32,
    #[validate(range(min = 1, message = "id_clinica must be a positive integer"))]
    #[schema(example = 3)]
    pub id_clinica: i32,
    #[validate(length(min = 3, message = "nome_veterinario must have at least 3 characters"))]
    #[schema(example = "Dra. Ana Souza")]
    pub nome_veterinario: String,
    #[validate(length(min = 10, message = "diagnostico must have at least 10 characters"))]
    #[schema(example = "Otite externa leve no ouvido esquerdo")]
    pub diagnostico: String,
    #[schema(example = "Gotas otológicas 2x ao dia por 7 dias")]
    pub prescricao: Option<String>,
    pub observacoes: Option<String>,
}

impl CreateConsultationRequest {
    fn into_consultation(self) -> AppResult<NewConsultation> {
        let held_at = parse_timestamp(&self.data_consulta).ok_or_else(|| {
            AppError::validation(
                "data_consulta",
                "data_consulta must be a date or date-time such as 2025-04-20T14:30:00",
            )
        })?;

        Ok(NewConsultation {
            pet_id: self.id_pet,
            clinic_id: self.id_clinica,
            held_at,
            vet_name: self.nome_veterinario,
            diagnosis: self.diagnostico,
            prescription: self.prescricao,
            notes: self.observacoes,
        })
    }
}

/// Authenticated `/consultas` routes
pub fn consultation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_consultation))
        .route("/pet/:id_pet", get(pet_history))
        .route("/:id", get(get_consultation))
}

/// Record a consultation for one of the caller's pets
#[utoipa::path(
    post,
    path = "/consultas",
    tag = "Consultations",
    security(("bearer_auth" = [])),
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, description = "Consultation recorded", body = ConsultationDetailResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Pet belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Pet or clinic not found", body = ErrorResponse)
    )
)]
pub async fn create_consultation(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreateConsultationRequest>,
) -> AppResult<Created<ConsultationDetailResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let record = state
        .consultation_service
        .record(payload.into_consultation()?, identity.id)
        .await?;
    Ok(Created(record.into()))
}

/// Consultation history of one of the caller's pets, newest first
#[utoipa::path(
    get,
    path = "/consultas/pet/{id_pet}",
    tag = "Consultations",
    security(("bearer_auth" = [])),
    params(("id_pet" = i32, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet and its consultations", body = ConsultationHistoryResponse),
        (status = 403, description = "Pet belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse)
    )
)]
pub async fn pet_history(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(pet_id): Path<i32>,
) -> AppResult<Json<ConsultationHistoryResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let history = state
        .consultation_service
        .history(pet_id, identity.id)
        .await?;
    Ok(Json(history.into()))
}

/// One consultation with its pet and clinic
#[utoipa::path(
    get,
    path = "/consultas/{id}",
    tag = "Consultations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consultation id")),
    responses(
        (status = 200, description = "Consultation", body = ConsultationDetailResponse),
        (status = 403, description = "Pet belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Consultation not found", body = ErrorResponse)
    )
)]
pub async fn get_consultation(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<Json<ConsultationDetailResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let record = state
        .consultation_service
        .get_detail(id, identity.id)
        .await?;
    Ok(Json(record.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(data_consulta: &str) -> CreateConsultationRequest {
        CreateConsultationRequest {
            data_consulta: data_consulta.to_string(),
            id_pet: 1,
            id_clinica: 3,
            nome_veterinario: "Dra. Ana Souza".to_string(),
            diagnostico: "Otite externa leve".to_string(),
            prescricao: None,
            observacoes: None,
        }
    }

    #[test]
    fn test_short_texts_rejected() {
        let short = CreateConsultationRequest {
            nome_veterinario: "Al".to_string(),
            diagnostico: "Otite".to_string(),
            ..request("2025-04-20T14:30:00")
        };
        let errors = short.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nome_veterinario"));
        assert!(fields.contains_key("diagnostico"));
    }

    #[test]
    fn test_unreadable_date_named() {
        match request("20/04/2025").into_consultation() {
            Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "data_consulta"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_date_parsed_into_consultation() {
        let new = request("2025-04-20 14:30").into_consultation().unwrap();
        assert_eq!(new.held_at.to_string(), "2025-04-20 14:30:00");
        assert_eq!((new.pet_id, new.clinic_id), (1, 3));
    }
}
