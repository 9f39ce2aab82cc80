// Password hashing and validation service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a PHC-format hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Validate password strength requirements
    ///
    /// 8 to 128 characters with at least one letter and one digit.
    pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidPasswordFormat(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(AuthError::InvalidPasswordFormat(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }
        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must contain at least one letter".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must contain at least one digit".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("corper2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify_password("corper2024", &hash).unwrap());
        assert!(!PasswordService::verify_password("corper2025", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = PasswordService::hash_password("corper2024").unwrap();
        let b = PasswordService::hash_password("corper2024").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(matches!(
            PasswordService::verify_password("x", "not-a-hash"),
            Err(AuthError::PasswordHashError)
        ));
    }

    #[test]
    fn test_strength_rules() {
        assert!(PasswordService::validate_password_strength("abc12345").is_ok());
        assert!(PasswordService::validate_password_strength("abc123").is_err());
        assert!(PasswordService::validate_password_strength("abcdefgh").is_err());
        assert!(PasswordService::validate_password_strength("12345678").is_err());
        assert!(PasswordService::validate_password_strength(&"a1".repeat(65)).is_err());
    }
}
