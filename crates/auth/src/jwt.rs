//! JWT token service.
//!
//! Access and refresh tokens are both HS256 but signed with different
//! secrets, so a refresh token can never pass as an access token and vice
//! versa.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuthError;

/// Value of [`Tokens::token_type`].
pub const TOKEN_TYPE: &str = "Bearer";

/// JWT payload. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token pair handed to clients after register, login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry of the access token.
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    fn encode(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<(String, DateTime<Utc>), AuthError> {
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::Token)?;
        Ok((token, exp))
    }

    fn decode(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(AuthError::InvalidToken)?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::MalformedSubject)
    }
}

/// Issues and validates access/refresh token pairs.
#[derive(Clone)]
pub struct JwtService {
    access: KeyPair,
    refresh: KeyPair,
}

impl JwtService {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_expire_minutes: i64,
        refresh_expire_minutes: i64,
    ) -> Self {
        Self {
            access: KeyPair::new(access_secret, access_expire_minutes),
            refresh: KeyPair::new(refresh_secret, refresh_expire_minutes),
        }
    }

    /// Issue a fresh token pair for `user_id`.
    pub fn create_tokens(&self, user_id: Uuid) -> Result<Tokens, AuthError> {
        self.create_tokens_at(user_id, Utc::now())
    }

    /// Issue a token pair as if the current time were `now`.
    pub fn create_tokens_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Tokens, AuthError> {
        let (access_token, expires_at) = self.access.encode(user_id, now)?;
        let (refresh_token, _) = self.refresh.encode(user_id, now)?;
        Ok(Tokens {
            access_token,
            refresh_token,
            expires_at,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Validate an access token and return its user id.
    pub fn decode_access(&self, token: &str) -> Result<Uuid, AuthError> {
        self.access.decode(token)
    }

    /// Validate a refresh token and return its user id.
    pub fn decode_refresh(&self, token: &str) -> Result<Uuid, AuthError> {
        self.refresh.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn service() -> JwtService {
        JwtService::new("access-secret", "refresh-secret", 15, 60 * 24)
    }

    #[test]
    fn tokens_round_trip_to_user_id() {
        let jwt = service();
        let user_id = Uuid::new_v4();
        let tokens = jwt.create_tokens(user_id).unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(jwt.decode_access(&tokens.access_token).unwrap(), user_id);
        assert_eq!(jwt.decode_refresh(&tokens.refresh_token).unwrap(), user_id);
    }

    #[test]
    fn expires_at_tracks_access_lifetime() {
        let jwt = service();
        let now = Utc::now();
        let tokens = jwt.create_tokens_at(Uuid::new_v4(), now).unwrap();
        assert_eq!(
            tokens.expires_at.timestamp(),
            (now + Duration::minutes(15)).timestamp()
        );
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let jwt = service();
        let tokens = jwt.create_tokens(Uuid::new_v4()).unwrap();

        let err = jwt.decode_access(&tokens.refresh_token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken(ref e) if matches!(e.kind(), ErrorKind::InvalidSignature)
        ));
        assert!(jwt.decode_refresh(&tokens.access_token).is_err());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let jwt = service();
        let issued = Utc::now() - Duration::minutes(30);
        let tokens = jwt.create_tokens_at(Uuid::new_v4(), issued).unwrap();

        let err = jwt.decode_access(&tokens.access_token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken(ref e) if matches!(e.kind(), ErrorKind::ExpiredSignature)
        ));
        // Refresh lifetime is a day, so the refresh token still works.
        assert!(jwt.decode_refresh(&tokens.refresh_token).is_ok());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = JwtService::new("someone-else", "refresh-secret", 15, 15);
        let tokens = other.create_tokens(Uuid::new_v4()).unwrap();
        assert!(service().decode_access(&tokens.access_token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            service().decode_access("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let claims = Claims {
            sub: "admin".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();
        assert!(matches!(
            service().decode_access(&token),
            Err(AuthError::MalformedSubject)
        ));
    }
}
