//! Pet owner profile handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{AuthRole, UserResponse};
use crate::errors::{AppResult, ErrorResponse};
use crate::services::Identity;

/// Authenticated `/users` routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a user account", body = ErrorResponse)
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<UserResponse>> {
    identity.require_role(&[AuthRole::Usuario])?;

    let user = state.user_service.get_user(identity.id).await?;
    Ok(Json(UserResponse::from(user)))
}
