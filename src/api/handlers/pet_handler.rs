//! Pet handlers. Every route is scoped to the authenticated owner.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AuthRole, NewPet, PetResponse, PetUpdate};
use crate::errors::{AppResult, ErrorResponse};
use crate::services::Identity;
use crate::types::{Created, ListResponse, NoContent, PetList};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePetRequest {
    #[validate(length(min = 1, message = "nome is required"))]
    #[schema(example = "Rex")]
    pub nome: String,
    #[validate(length(min = 1, message = "especie is required"))]
    #[schema(example = "Cachorro")]
    pub especie: String,
    #[validate(length(min = 1, message = "raca is required"))]
    #[schema(example = "Labrador")]
    pub raca: String,
    #[validate(range(min = 0.0, message = "peso must not be negative"))]
    #[schema(example = 28.5)]
    pub peso: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePetRequest {
    #[validate(length(min = 1, message = "nome must not be empty"))]
    pub nome: Option<String>,
    #[validate(length(min = 1, message = "especie must not be empty"))]
    pub especie: Option<String>,
    #[validate(length(min = 1, message = "raca must not be empty"))]
    pub raca: Option<String>,
    #[validate(range(min = 0.0, message = "peso must not be negative"))]
    pub peso: Option<f64>,
}

impl From<UpdatePetRequest> for PetUpdate {
    fn from(request: UpdatePetRequest) -> Self {
        Self {
            name: request.nome,
            species: request.especie,
            breed: request.raca,
            weight: request.peso,
        }
    }
}

/// Authenticated `/pets` routes
pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pets).post(create_pet))
        .route("/:id", get(get_pet).put(update_pet).delete(delete_pet))
}

/// List the caller's pets
#[utoipa::path(
    get,
    path = "/pets",
    tag = "Pets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's pets", body = PetList),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a user account", body = ErrorResponse)
    )
)]
pub async fn list_pets(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ListResponse<PetResponse>>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let pets = state.pet_service.list_pets(identity.id).await?;
    Ok(Json(pets.into_iter().collect()))
}

/// Register a pet for the caller
#[utoipa::path(
    post,
    path = "/pets",
    tag = "Pets",
    security(("bearer_auth" = [])),
    request_body = CreatePetRequest,
    responses(
        (status = 201, description = "Pet created", body = PetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreatePetRequest>,
) -> AppResult<Created<PetResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let pet = state
        .pet_service
        .create_pet(NewPet {
            name: payload.nome,
            species: payload.especie,
            breed: payload.raca,
            weight: payload.peso,
            owner_id: identity.id,
        })
        .await?;

    Ok(Created(PetResponse::from(pet)))
}

/// Get one of the caller's pets
#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet", body = PetResponse),
        (status = 403, description = "Pet belongs to another user", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse)
    )
)]
pub async fn get_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<Json<PetResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let pet = state.pet_service.get_pet(id, identity.id).await?;
    Ok(Json(PetResponse::from(pet)))
}

/// Update one of the caller's pets
#[utoipa::path(
    put,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet id")),
    request_body = UpdatePetRequest,
    responses(
        (status = 200, description = "Pet updated", body = PetResponse),
        (status = 403, description = "Pet belongs to another user", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse)
    )
)]
pub async fn update_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdatePetRequest>,
) -> AppResult<Json<PetResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let pet = state
        .pet_service
        .update_pet(id, identity.id, payload.into())
        .await?;
    Ok(Json(PetResponse::from(pet)))
}

/// Delete one of the caller's pets
#[utoipa::path(
    delete,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Pet id")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 403, description = "Pet belongs to another user", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 422, description = "Pet has scheduled appointments", body = ErrorResponse)
    )
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    identity.require_role(&[AuthRole::Usuario])?;

    state.pet_service.delete_pet(id, identity.id).await?;
    Ok(NoContent)
}
