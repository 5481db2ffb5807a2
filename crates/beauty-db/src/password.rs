//! # Password Hashing
//!
//! Profiles store an argon2 PHC string, never the password itself.
//!
//! ```text
//! create / update password            login
//!        │                               │
//!        ▼                               ▼
//! hash_password("emp123")         verify_password("emp123", stored)
//!        │                               │
//!        ▼                               ▼
//! "$argon2id$v=19$m=19456,t=2,p=1$..."   true / false
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::DbResult;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a password against a stored hash.
///
/// A malformed stored hash counts as a mismatch so that login keeps
/// answering with the same generic error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("emp123").unwrap();
        let b = hash_password("emp123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        assert!(!verify_password("emp123", "emp123"));
    }
}
