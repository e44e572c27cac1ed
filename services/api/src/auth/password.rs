use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::ApiError;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Burn one hash worth of work when the email lookup misses, so unknown
/// and known emails take comparable time on login.
pub fn dummy_verify(password: &str) {
    let _ = hash_password(password);
}

/// Random 16-character alphanumeric password for admin resets. Returned
/// to the admin once, stored only as a hash.
pub fn generate_temp_password() -> String {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| rng.sample(Alphanumeric) as char).collect()
}
