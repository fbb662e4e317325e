use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
}

/// Claims carried by tokens issued from the login endpoint.
///
/// The basic-auth middleware never consults these; the token path exists for
/// clients that want to exchange credentials once, but request authorization
/// stays credential-based.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: String, user_id: i64) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: username,
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// One-way salted hash of a raw password.
pub fn hash_password(raw: &str) -> Result<String, AuthError> {
    let cost = config::config().security.bcrypt_cost;
    Ok(bcrypt::hash(raw, cost)?)
}

/// Re-derive and compare against a stored hash.
pub fn verify_password(raw: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(raw, hash)?)
}
