//! Account registration and login for users and clinics.

use axum::{extract::State, response::Json, routing::post, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ClinicResponse, UserResponse};
use crate::errors::{AppResult, ErrorResponse};
use crate::services::TokenResponse;
use crate::types::Created;

static CPF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9.\-]{11,14}$").unwrap());
static CNPJ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9./\-]{14,18}$").unwrap());

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, message = "nome is required"))]
    #[schema(example = "Maria Souza")]
    pub nome: String,
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "senha must be at least 8 characters"))]
    #[schema(example = "SenhaSegura123", min_length = 8)]
    pub senha: String,
    #[validate(regex(path = *CPF_RE, message = "cpf must have 11 to 14 digits, dots or dashes"))]
    #[schema(example = "123.456.789-09")]
    pub cpf: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserRequest {
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "senha is required"))]
    #[schema(example = "SenhaSegura123")]
    pub senha: String,
}

/// Clinic registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterClinicRequest {
    #[validate(length(min = 1, message = "nome is required"))]
    #[schema(example = "Clínica Vida Animal")]
    pub nome: String,
    #[validate(regex(path = *CNPJ_RE, message = "cnpj must have 14 to 18 digits, dots, slashes or dashes"))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,
    #[validate(length(min = 8, max = 20, message = "telefone must have 8 to 20 characters"))]
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,
    #[validate(length(min = 8, message = "senha must be at least 8 characters"))]
    #[schema(example = "ClinicPass2024", min_length = 8)]
    pub senha: String,
    #[validate(url(message = "foto must be a URL"))]
    #[schema(example = "https://cdn.example.com/clinica.png")]
    pub foto: Option<String>,
}

/// Clinic login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginClinicRequest {
    #[validate(length(min = 1, message = "cnpj is required"))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,
    #[validate(length(min = 1, message = "senha is required"))]
    #[schema(example = "ClinicPass2024")]
    pub senha: String,
}

/// `/users` registration and login
pub fn user_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/cadastro", post(register_user))
        .route("/login", post(login_user))
}

/// `/clinicas` registration and login
pub fn clinic_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/cadastro", post(register_clinic))
        .route("/login", post(login_clinic))
}

/// Register a pet owner
#[utoipa::path(
    post,
    path = "/users/cadastro",
    tag = "Authentication",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email or CPF already registered", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .register_user(payload.nome, payload.email, payload.senha, payload.cpf)
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login as a pet owner
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Authentication",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginUserRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login_user(payload.email, payload.senha)
        .await?;

    Ok(Json(token))
}

/// Register a clinic
#[utoipa::path(
    post,
    path = "/clinicas/cadastro",
    tag = "Authentication",
    request_body = RegisterClinicRequest,
    responses(
        (status = 201, description = "Clinic registered", body = ClinicResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "CNPJ already registered", body = ErrorResponse)
    )
)]
pub async fn register_clinic(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterClinicRequest>,
) -> AppResult<Created<ClinicResponse>> {
    let clinic = state
        .auth_service
        .register_clinic(
            payload.nome,
            payload.cnpj,
            payload.telefone,
            payload.senha,
            payload.foto,
        )
        .await?;

    Ok(Created(ClinicResponse::from(clinic)))
}

/// Login as a clinic
#[utoipa::path(
    post,
    path = "/clinicas/login",
    tag = "Authentication",
    request_body = LoginClinicRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login_clinic(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginClinicRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login_clinic(payload.cnpj, payload.senha)
        .await?;

    Ok(Json(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_format() {
        let mut request = RegisterUserRequest {
            nome: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            senha: "SenhaSegura123".to_string(),
            cpf: "123.456.789-09".to_string(),
        };
        assert!(request.validate().is_ok());

        request.cpf = "12345678909".to_string();
        assert!(request.validate().is_ok());

        request.cpf = "123-abc".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_clinic_registration_rules() {
        let request = RegisterClinicRequest {
            nome: String::new(),
            cnpj: "12.345.678/0001-90".to_string(),
            telefone: "(11) 98765-4321".to_string(),
            senha: "short".to_string(),
            foto: Some("not a url".to_string()),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nome"));
        assert!(fields.contains_key("senha"));
        assert!(fields.contains_key("foto"));
        assert!(!fields.contains_key("cnpj"));
    }
}
