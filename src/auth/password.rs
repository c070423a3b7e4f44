//! Password hashing and verification.
//!
//! New hashes use Argon2id with the cost parameters below. A stored hash
//! is a PHC string that carries its own salt, algorithm and costs, so
//! existing credentials keep verifying if those parameters change later.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Argon2 memory cost in KiB (64 MiB).
const ARGON2_MEMORY_KIB: u32 = 64 * 1024;

/// Argon2 iteration count.
const ARGON2_ITERATIONS: u32 = 3;

/// Argon2 lane count.
const ARGON2_LANES: u32 = 4;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is shorter than the policy allows.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is longer than the policy allows.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Hashing itself failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Stored verifier does not parse as a PHC hash string.
    ///
    /// Signals corrupt or hand-edited stored data rather than a wrong
    /// password. The login flow answers as if the password were wrong,
    /// but the condition deserves a log entry.
    #[error("stored password hash is corrupt")]
    CorruptVerifier,

    /// Password does not match the stored verifier.
    #[error("password verification failed")]
    Mismatch,
}

fn hasher() -> Argon2<'static> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_LANES, None)
        .expect("static Argon2 parameters are valid");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// The length policy is applied before hashing. On success the result is
/// a PHC string ready to store.
///
/// # Examples
///
/// ```
/// use wicket::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a password attempt against a stored PHC hash.
///
/// The salt and cost parameters come from the stored string, and the
/// comparison runs in constant time inside the argon2 crate. No length
/// policy applies here, so out-of-policy passwords from older data still
/// verify.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::CorruptVerifier)?;

    hasher()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// Apply the password length policy.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
