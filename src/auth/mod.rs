//! Account registration, login, and bearer-token authentication.
//!
//! Credentials are argon2-hashed at rest; sessions are signed JWTs carrying
//! the username as the subject claim. Every owner-scoped endpoint resolves
//! the caller through [`AuthenticatedUser`].

mod extractor;
mod password;
pub mod routes;
mod token;

pub use extractor::AuthenticatedUser;
pub use password::{hash_password, verify_password};
pub use token::{create_access_token, verify_access_token, Claims};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Error types for authentication operations
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Could not validate credentials")]
    TokenInvalid,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,
}

fn default_jwt_secret() -> String {
    "dev_secret_123".to_string()
}

fn default_token_expiry_minutes() -> i64 {
    // 24 hours
    1440
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_expiry_minutes: default_token_expiry_minutes(),
        }
    }
}

impl AuthConfig {
    /// Apply environment variable overrides
    pub fn apply_env_vars(&mut self) {
        if let Ok(secret) = std::env::var("TEXTFOLD_JWT_SECRET") {
            self.jwt_secret = secret;
        }
    }
}
