// ============================
// authgate-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use zeroize::Zeroize;

use super::CredentialError;

/// Hash a password using Argon2id with a fresh random salt.
/// Returns a PHC string carrying the algorithm parameters.
pub fn hash_password(plain: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash.
///
/// `Ok(false)` is a mismatch. Anything else the hasher reports (unparsable
/// hash, unsupported parameters) is an error, not a wrong password.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, CredentialError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| CredentialError::Hash(e.to_string()))?;
    // A PHC string without salt or output parses, but can never match
    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(CredentialError::Hash(
            "stored hash has no salt or output".to_string(),
        ));
    }

    match Argon2::default().verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hash(e.to_string())),
    }
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String) -> Result<String, CredentialError> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}
