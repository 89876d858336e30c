//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_CORS_ORIGIN, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Startup configuration errors. Any of these is fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    JwtSecretTooShort(usize),

    #[error("JWT_EXPIRATION_HOURS must be a positive integer, got {0:?}")]
    InvalidExpiration(String),
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// The signing key has no default: a missing or short `JWT_SECRET`
    /// is rejected so the server never signs tokens with a guessable key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        let jwt_expiration_hours = match lookup("JWT_EXPIRATION_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => return Err(ConfigError::InvalidExpiration(raw)),
            },
            None => DEFAULT_JWT_EXPIRATION_HOURS,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = Config::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingJwtSecret);
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let result = Config::from_lookup(lookup(&[("JWT_SECRET", "")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingJwtSecret);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::from_lookup(lookup(&[("JWT_SECRET", "short")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH)
        );
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();
        assert_eq!(config.jwt_expiration_hours, 1);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.cors_allowed_origin, DEFAULT_CORS_ORIGIN);
        assert_eq!(config.jwt_secret_bytes(), SECRET.as_bytes());
    }

    #[test]
    fn test_invalid_expiration_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRATION_HOURS", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidExpiration(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }
}
