//! Argon2 password hasher implementation.

use crate::error::{Error, Result};
use crate::providers::PasswordHasher;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier};

/// Argon2id password hasher.
///
/// Uses the argon2 crate's default parameters and a fresh random salt per
/// hash. Both operations run on a blocking thread since key derivation
/// takes tens of milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| {
                    tracing::error!(error = %e, "password hashing failed");
                    Error::InternalError
                })
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            Error::InternalError
        })?
    }

    async fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let password = password.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&digest).map_err(|e| {
                tracing::error!(error = %e, "stored password digest is malformed");
                Error::InternalError
            })?;
            // A mismatch is a plain false; only parse failures are errors.
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            Error::InternalError
        })?
    }
}
