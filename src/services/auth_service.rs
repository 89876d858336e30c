//! Authentication service - Account registration, login and bearer tokens.
//!
//! Tokens are stateless HS256 JWTs; nothing is stored server-side and
//! there is no revocation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{AuthRole, Clinic, NewClinic, NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: AuthRole,
    pub iat: i64,
    pub exp: i64,
}

/// Verified caller identity decoded from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub role: AuthRole,
}

impl Identity {
    /// Fail with `Forbidden` unless the role is in the allowed set
    pub fn require_role(&self, allowed: &[AuthRole]) -> AppResult<&Self> {
        if self.role.is_one_of(allowed) {
            Ok(self)
        } else {
            tracing::debug!(id = self.id, role = %self.role, "Role not allowed");
            Err(AppError::Forbidden)
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub role: AuthRole,
}

/// Signs and verifies bearer tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl TokenIssuer {
    /// # Errors
    /// Returns `Internal` when the secret is empty.
    pub fn new(secret: &[u8], expiration_hours: i64) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::internal("Token signing key must not be empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expiration_hours,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.jwt_secret_bytes(), config.jwt_expiration_hours)
    }

    /// Issue a token for `{id, email, role}`
    pub fn issue(&self, id: i32, email: &str, role: AuthRole) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token encoding failed: {}", e)))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
            role,
        })
    }

    /// Verify signature and expiry. Any failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::InvalidToken
        })?;

        Ok(Identity::from(data.claims))
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a pet owner account
    async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        cpf: String,
    ) -> AppResult<User>;

    async fn login_user(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Register a clinic account
    async fn register_clinic(
        &self,
        name: String,
        cnpj: String,
        phone: String,
        password: String,
        photo_url: Option<String>,
    ) -> AppResult<Clinic>;

    async fn login_clinic(&self, cnpj: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a bearer token and return the caller identity
    fn verify_token(&self, token: &str) -> AppResult<Identity>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenIssuer,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: TokenIssuer) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        cpf: String,
    ) -> AppResult<User> {
        let users = self.uow.users();

        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }
        if users.find_by_cpf(&cpf).await?.is_some() {
            return Err(AppError::conflict("CPF already registered"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = users
            .create(NewUser {
                name,
                email,
                cpf,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn login_user(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify even when the account is absent so timing does not leak it
        let valid = Password::verify_or_dummy(
            user.as_ref().map(|u| u.password_hash.as_str()),
            &password,
        );

        match user {
            Some(user) if valid => self.tokens.issue(user.id, &user.email, AuthRole::Usuario),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn register_clinic(
        &self,
        name: String,
        cnpj: String,
        phone: String,
        password: String,
        photo_url: Option<String>,
    ) -> AppResult<Clinic> {
        let clinics = self.uow.clinics();

        if clinics.find_by_cnpj(&cnpj).await?.is_some() {
            return Err(AppError::conflict("CNPJ already registered"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let clinic = clinics
            .create(NewClinic {
                name,
                cnpj,
                phone,
                photo_url,
                password_hash,
            })
            .await?;

        tracing::info!(clinic_id = clinic.id, "Clinic registered");
        Ok(clinic)
    }

    async fn login_clinic(&self, cnpj: String, password: String) -> AppResult<TokenResponse> {
        let clinic = self.uow.clinics().find_by_cnpj(&cnpj).await?;

        let valid = Password::verify_or_dummy(
            clinic.as_ref().map(|c| c.password_hash.as_str()),
            &password,
        );

        match clinic {
            // Clinic tokens carry the cnpj where user tokens carry the email
            Some(clinic) if valid => self.tokens.issue(clinic.id, &clinic.cnpj, AuthRole::Clinica),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Identity> {
        self.tokens.verify(token)
    }
}
