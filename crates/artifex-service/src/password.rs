//! Password hashing with Argon2id.
//!
//! Hashing and verification are CPU-bound, so the async wrappers run them on
//! the tokio blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::ApiError;

/// Hash a password, producing a PHC-format string.
///
/// # Errors
///
/// Returns an internal error if hashing fails.
pub async fn hash(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a mismatch or an unparseable hash; never distinguishes
/// the two to the caller.
///
/// # Errors
///
/// Returns an internal error if the blocking task fails.
pub async fn verify(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hashed = hash("hunter2".into()).await.unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("hunter2".into(), hashed.clone()).await.unwrap());
        assert!(!verify("hunter3".into(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_fails_closed() {
        assert!(!verify("hunter2".into(), "not-a-hash".into()).await.unwrap());
    }
}
