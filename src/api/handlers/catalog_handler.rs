//! Service catalog handlers. Reading is public, writing needs a clinic token.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    AuthRole, NewService, NewServiceType, ServiceResponse, ServiceTypeResponse,
};
use crate::errors::{AppResult, ErrorResponse};
use crate::services::Identity;
use crate::types::{Created, ListResponse, ServiceList, ServiceTypeList};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "nome is required"))]
    #[schema(example = "Vacinação")]
    pub nome: String,
    #[validate(length(min = 1, message = "descricao is required"))]
    #[schema(example = "Aplicação de vacinas")]
    pub descricao: String,
    #[validate(range(min = 0.0, message = "preco must not be negative"))]
    #[schema(example = 120.0)]
    pub preco: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceTypeRequest {
    #[validate(length(min = 1, message = "nome is required"))]
    #[schema(example = "V10")]
    pub nome: String,
    #[validate(range(min = 1, message = "id_servico must be a positive integer"))]
    #[schema(example = 1)]
    pub id_servico: i32,
}

/// Public `/servicos` routes
pub fn catalog_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services))
        .route("/tipos", get(list_service_types))
}

/// Authenticated `/servicos` routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_service))
        .route("/tipos", axum::routing::post(create_service_type))
}

/// List catalog services
#[utoipa::path(
    get,
    path = "/servicos",
    tag = "Catalog",
    responses((status = 200, description = "All services", body = ServiceList))
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<ServiceResponse>>> {
    let services = state.catalog_service.list_services().await?;
    Ok(Json(services.into_iter().collect()))
}

/// Create a catalog service
#[utoipa::path(
    post,
    path = "/servicos",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a clinic account", body = ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> AppResult<Created<ServiceResponse>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let service = state
        .catalog_service
        .create_service(NewService {
            name: payload.nome,
            description: payload.descricao,
            price: payload.preco,
        })
        .await?;

    Ok(Created(service.into()))
}

/// List service types
#[utoipa::path(
    get,
    path = "/servicos/tipos",
    tag = "Catalog",
    responses((status = 200, description = "All service types", body = ServiceTypeList))
)]
pub async fn list_service_types(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<ServiceTypeResponse>>> {
    let types = state.catalog_service.list_service_types().await?;
    Ok(Json(types.into_iter().collect()))
}

/// Create a service type under an existing service
#[utoipa::path(
    post,
    path = "/servicos/tipos",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateServiceTypeRequest,
    responses(
        (status = 201, description = "Service type created", body = ServiceTypeResponse),
        (status = 403, description = "Not a clinic account", body = ErrorResponse),
        (status = 404, description = "Parent service not found", body = ErrorResponse)
    )
)]
pub async fn create_service_type(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreateServiceTypeRequest>,
) -> AppResult<Created<ServiceTypeResponse>> {
    identity.require_role(&[AuthRole::Clinica])?;

    let service_type = state
        .catalog_service
        .create_service_type(NewServiceType {
            name: payload.nome,
            service_id: payload.id_servico,
        })
        .await?;

    Ok(Created(service_type.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let request = CreateServiceRequest {
            nome: "Banho".to_string(),
            descricao: "Banho e tosa".to_string(),
            preco: -1.0,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("preco"));
    }

    #[test]
    fn test_service_type_needs_parent() {
        let request = CreateServiceTypeRequest {
            nome: "V10".to_string(),
            id_servico: 0,
        };
        assert!(request.validate().is_err());
    }
}
