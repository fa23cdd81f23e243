//! bcrypt password hashing.

use crate::AuthError;

/// Hash `password` with bcrypt at the library's default cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Check `password` against a stored bcrypt `hash`.
///
/// A malformed hash is reported as an error, a mismatch as `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}
