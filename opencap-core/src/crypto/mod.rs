//! Password hashing
//!
//! Hashes are self-describing strings `pbkdf2-sha256$<iterations>$<salt>$<hash>`
//! with base64 salt and hash, so the iteration count can change without
//! invalidating stored accounts.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

/// Iteration count for newly created hashes.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 50;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    pbkdf2_hmac_array::<Sha256, HASH_LENGTH>(password.as_bytes(), salt, iterations)
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check the password policy: 8-50 characters, no whitespace, and at least
/// one upper-case letter, one digit and one punctuation or symbol character.
pub fn validate_password(password: &str) -> CoreResult<()> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(CoreError::ValidationError(format!(
            "Password must be {MIN_PASSWORD_LENGTH}-{MAX_PASSWORD_LENGTH} characters"
        )));
    }

    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_special = false;
    for c in password.chars() {
        if c.is_whitespace() {
            return Err(CoreError::ValidationError(
                "Password must not contain whitespace".to_string(),
            ));
        }
        has_upper |= c.is_uppercase();
        has_digit |= c.is_numeric();
        has_special |= !c.is_alphanumeric();
    }

    if has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(CoreError::ValidationError(
            "Password must contain an upper-case letter, a digit and a special character"
                .to_string(),
        ))
    }
}

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, DEFAULT_PBKDF2_ITERATIONS)
}

/// Hash a password with an explicit iteration count.
#[must_use]
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        BASE64.encode(salt),
        BASE64.encode(hash)
    )
}

/// Verify a password against a stored hash string.
///
/// Returns `Ok(false)` for a wrong password and an error only when the stored
/// string is not a hash this module produced.
pub fn verify_password(password: &str, stored: &str) -> CoreResult<bool> {
    let malformed = || CoreError::SerializationError("Malformed password hash".to_string());

    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(malformed());
    };

    if scheme != SCHEME {
        return Err(malformed());
    }
    let iterations: u32 = iterations.parse().map_err(|_| malformed())?;
    let salt = BASE64.decode(salt).map_err(|_| malformed())?;
    let expected = BASE64.decode(hash).map_err(|_| malformed())?;

    let candidate = derive(password, &salt, iterations);
    Ok(constant_time_eq(&candidate, &expected))
}
