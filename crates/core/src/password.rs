//! Password hashing and strength checks.
//!
//! Hashes are Argon2id in PHC string form, so every stored hash carries its
//! own algorithm parameters and salt. Salts come from the OS CSPRNG via
//! `rand_core`'s `OsRng`; this crate depends on `rand_core` with the
//! `getrandom` feature directly so it stands alone, without relying on some
//! other crate in the build graph to switch the RNG on.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash string.
///
/// `Ok(false)` means the password simply did not match; any other failure
/// (e.g. a corrupt hash) surfaces as `Err`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Reject passwords shorter than `min_length` characters.
///
/// The error carries a user-presentable message.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.len() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
