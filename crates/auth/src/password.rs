//! Credential verification (one-way password hashing).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

use crate::error::{AuthError, AuthResult};

/// Hash a plaintext password with a per-call random salt.
///
/// Argon2id with default parameters; the salt and parameters are embedded in
/// the PHC-format output, so [`compare`] needs nothing but the stored string.
pub fn hash(plaintext: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;
    Ok(hashed.to_string())
}

/// Check a presented password against a stored hash.
///
/// Never errors: a malformed stored hash compares as `false`.
pub fn compare(plaintext: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
