//! Password value object shared by user and clinic accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Well-formed argon2 hash that no password verifies against.
///
/// Logins for unknown accounts verify against it so the response time
/// does not reveal whether the email or cnpj exists.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$2gkMXp3dGb0yG7C+Fq0Hf2b9cOS6lVQ1Uqk1yM7wTtQ";

/// Argon2-hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password.
    ///
    /// # Errors
    /// Returns a validation error on the `senha` field if the password is
    /// shorter than the minimum length.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(
                "senha",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap a hash loaded from the database.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password. Malformed stored hashes never verify.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        }
    }

    /// Verify against an account hash that may not exist.
    ///
    /// Runs a full verification against [`DUMMY_HASH`] when `stored` is
    /// `None` and always reports failure in that case.
    pub fn verify_or_dummy(stored: Option<&str>, plain_text: &str) -> bool {
        match stored {
            Some(hash) => Password::from_hash(hash.to_string()).verify(plain_text),
            None => {
                let _ = Password::from_hash(DUMMY_HASH.to_string()).verify(plain_text);
                false
            }
        }
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("SenhaSegura123!").unwrap();

        assert!(password.verify("SenhaSegura123!"));
        assert!(!password.verify("SenhaErrada123"));
    }

    #[test]
    fn test_password_from_hash() {
        let password = Password::new("TestPassword123").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("TestPassword123"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let pass1 = Password::new("SamePassword123").unwrap();
        let pass2 = Password::new("SamePassword123").unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("SamePassword123"));
        assert!(pass2.verify("SamePassword123"));
    }

    #[test]
    fn test_password_too_short() {
        let err = Password::new("short").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref fields) if fields[0].field == "senha"));
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn test_verify_or_dummy_missing_account_fails() {
        assert!(!Password::verify_or_dummy(None, "anything-at-all"));
    }

    #[test]
    fn test_verify_or_dummy_existing_account() {
        let password = Password::new("ClinicPass2024").unwrap();
        assert!(Password::verify_or_dummy(Some(password.as_str()), "ClinicPass2024"));
        assert!(!Password::verify_or_dummy(Some(password.as_str()), "wrong-pass"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-hash".to_string()).verify("whatever"));
    }
}
