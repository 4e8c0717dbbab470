use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthConfig, AuthError, AuthResult};

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The owner identity (username)
    pub sub: String,
    /// Expiry as seconds since the epoch
    pub exp: usize,
}

/// Generate a signed access token with an expiration timestamp
pub fn create_access_token(username: &str, config: &AuthConfig) -> AuthResult<String> {
    let expire = Utc::now() + Duration::minutes(config.token_expiry_minutes);
    let claims = Claims {
        sub: username.to_string(),
        exp: expire.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Verify a token's signature and expiry, returning the subject username
pub fn verify_access_token(token: &str, config: &AuthConfig) -> AuthResult<String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AuthError::TokenInvalid)?;
    Ok(data.claims.sub)
}
