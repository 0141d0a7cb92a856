//! Configuration for the token service

use chrono::Duration;
use et_shared::config::JwtConfig;
use jsonwebtoken::Algorithm;

use crate::domain::entities::token::{
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::TokenError;

/// Longest configurable token lifetime (one year)
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing algorithm, must match the signing keys
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Value of the `aud` claim
    pub audience: String,
    /// Clock skew tolerance in seconds for expiry and not-before
    pub leeway: u64,
    /// Tokens issued further than this in the future are rejected
    pub max_issued_at_skew: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            refresh_token_lifetime: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            leeway: 0,
            max_issued_at_skew: Duration::minutes(5),
        }
    }
}

impl TokenServiceConfig {
    /// Builds the service configuration from the shared JWT settings
    ///
    /// # Errors
    ///
    /// * `TokenError::KeyLoadError` - unsupported algorithm, or a lifetime that is
    ///   not positive or longer than [`MAX_TOKEN_LIFETIME_SECONDS`]
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, TokenError> {
        Ok(Self {
            algorithm: parse_algorithm(&jwt.algorithm)?,
            access_token_lifetime: lifetime("access", jwt.access_token_expiry)?,
            refresh_token_lifetime: lifetime("refresh", jwt.refresh_token_expiry)?,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            leeway: jwt.leeway,
            ..Self::default()
        })
    }
}

fn lifetime(kind: &str, seconds: i64) -> Result<Duration, TokenError> {
    if seconds <= 0 || seconds > MAX_TOKEN_LIFETIME_SECONDS {
        return Err(TokenError::KeyLoadError {
            message: format!(
                "{} token lifetime must be between 1 and {} seconds, got {}",
                kind, MAX_TOKEN_LIFETIME_SECONDS, seconds
            ),
        });
    }
    Duration::try_seconds(seconds).ok_or_else(|| TokenError::KeyLoadError {
        message: format!("{} token lifetime out of range: {}", kind, seconds),
    })
}

/// Only the two algorithms the key loader supports
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "RS256" => Ok(Algorithm::RS256),
        other => Err(TokenError::KeyLoadError {
            message: format!("unsupported JWT algorithm: {}", other),
        }),
    }
}
