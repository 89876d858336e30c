//! Authentication roles carried in bearer tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_CLINICA, ROLE_USUARIO};

/// Who a token was issued to: a pet owner or a clinic account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AuthRole {
    #[serde(rename = "USUARIO")]
    Usuario,
    #[serde(rename = "CLINICA")]
    Clinica,
}

impl AuthRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthRole::Usuario => ROLE_USUARIO,
            AuthRole::Clinica => ROLE_CLINICA,
        }
    }

    /// Check membership in an allowed set
    pub fn is_one_of(&self, allowed: &[AuthRole]) -> bool {
        allowed.contains(self)
    }
}

impl std::fmt::Display for AuthRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
