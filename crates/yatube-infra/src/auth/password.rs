//! Argon2id hashing of account passwords.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use yatube_core::ports::{AuthError, PasswordService};

/// Stored hashes starting with this marker belong to accounts that cannot
/// log in with a password (seeded or imported users).
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Hashes account passwords into PHC strings (`$argon2id$...`).
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        if stored.starts_with(UNUSABLE_PASSWORD_PREFIX) {
            return Ok(false);
        }

        let parsed = PasswordHash::new(stored).map_err(|e| {
            tracing::error!("Stored password hash is not a PHC string: {}", e);
            AuthError::HashingError(e.to_string())
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
