//! `auth` crate: password hashing and JWT access/refresh tokens.
//!
//! Pure functions only: nothing here touches the database or HTTP.

pub mod error;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtService, Tokens, TOKEN_TYPE};
pub use password::{hash_password, verify_password};
