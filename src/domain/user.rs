//! Pet owner accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// National id (CPF)
    pub cpf: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to persist a new user (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password_hash: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Maria Souza")]
    pub nome: String,
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[schema(example = "123.456.789-09")]
    pub cpf: String,
    pub criado_em: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nome: user.name,
            email: user.email,
            cpf: user.cpf,
            criado_em: user.created_at,
        }
    }
}
