//! Auth error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Signing failed; decoding problems are reported as `InvalidToken`.
    #[error("token encoding failed: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// The token decoded but its subject is not a user id.
    #[error("malformed token subject")]
    MalformedSubject,
}
