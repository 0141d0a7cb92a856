//! Main token service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::domain::entities::{Entity, User};
use crate::domain::value_objects::Identifier;
use crate::errors::TokenError;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::key_manager::SigningKeys;

/// Issues and verifies signed access and refresh tokens
///
/// The service holds the signing keys and a clock. It never touches storage;
/// revocation is layered on top by
/// [`TokenRevocationService`](super::TokenRevocationService).
pub struct TokenService {
    keys: SigningKeys,
    config: TokenServiceConfig,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &self.keys)
            .field("config", &self.config)
            .finish()
    }
}

impl TokenService {
    /// Creates a token service reading the system clock
    ///
    /// # Arguments
    ///
    /// * `keys` - Signing keys loaded at startup
    /// * `config` - Lifetimes and claim values
    ///
    /// # Errors
    ///
    /// * `TokenError::KeyLoadError` - the configured algorithm does not match the keys
    pub fn new(keys: SigningKeys, config: TokenServiceConfig) -> Result<Self, TokenError> {
        if keys.algorithm() != config.algorithm {
            return Err(TokenError::KeyLoadError {
                message: format!(
                    "configured algorithm {:?} does not match signing keys ({:?})",
                    config.algorithm,
                    keys.algorithm()
                ),
            });
        }

        let mut validation = Validation::new(keys.algorithm());
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub", "iss", "aud"]);
        // time claims are checked against the injected clock
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            keys,
            config,
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a short-lived access token for `user`
    pub fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        self.issue(user.id(), TokenKind::Access)
    }

    /// Issues a long-lived refresh token for `user`
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
        self.issue(user.id(), TokenKind::Refresh)
    }

    /// Issues both tokens for `user`
    pub fn issue_token_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access_token(user)?;
        let refresh_token = self.issue_refresh_token(user)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_lifetime.num_seconds(),
            self.config.refresh_token_lifetime.num_seconds(),
        ))
    }

    /// Signs a token of `kind` for `subject`
    pub fn issue(&self, subject: Identifier, kind: TokenKind) -> Result<String, TokenError> {
        let lifetime = match kind {
            TokenKind::Access => self.config.access_token_lifetime,
            TokenKind::Refresh => self.config.refresh_token_lifetime,
        };
        let claims = Claims::new(
            subject,
            kind,
            self.clock.now(),
            lifetime,
            &self.config.issuer,
            &self.config.audience,
        )
        .inspect_err(|_| {
            debug!(kind = %kind, lifetime_secs = lifetime.num_seconds(), "Token expiry out of range")
        })?;

        let token = encode(
            &Header::new(self.keys.algorithm()),
            &claims,
            self.keys.encoding_key(),
        )
        .map_err(|e| {
            debug!(error = %e, "JWT encoding failed");
            TokenError::TokenGenerationFailed
        })?;

        debug!(
            subject = %subject,
            kind = %kind,
            jti = %claims.jti,
            fingerprint = %token_fingerprint(&token),
            "Token issued"
        );
        Ok(token)
    }

    /// Verifies `token` and returns its claims, or the reason it was rejected
    ///
    /// Checks, in order: signature, issuer and audience, kind, issued-at skew,
    /// expiry and not-before.
    pub fn inspect(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let result = self.decode_claims(token, expected);
        if let Err(error) = &result {
            debug!(
                fingerprint = %token_fingerprint(token),
                expected = %expected,
                error = %error,
                "Token rejected"
            );
        }
        result
    }

    /// Whether `token` is a currently valid token of `kind`; never fails
    pub fn validate(&self, token: &str, kind: TokenKind) -> bool {
        self.inspect(token, kind).is_ok()
    }

    /// Subject of a currently valid token of `kind`, `None` otherwise
    pub fn extract_subject(&self, token: &str, kind: TokenKind) -> Option<Identifier> {
        self.inspect(token, kind).ok().and_then(|claims| claims.subject())
    }

    /// Shorthand for validating a token presented to authorize resource access
    pub fn validate_access(&self, token: &str) -> bool {
        self.validate(token, TokenKind::Access)
    }

    /// Shorthand for the subject of an access token
    pub fn access_subject(&self, token: &str) -> Option<Identifier> {
        self.extract_subject(token, TokenKind::Access)
    }

    /// Issues a new access token for the subject of a valid refresh token
    ///
    /// # Errors
    ///
    /// * `TokenError::WrongTokenKind` - an access token was presented
    /// * Any other rejection reason from [`inspect`](Self::inspect)
    pub fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.inspect(refresh_token, TokenKind::Refresh)?;
        let subject = claims.subject().ok_or_else(|| TokenError::InvalidClaims {
            claim: "sub".to_string(),
        })?;

        let access_token = self.issue(subject, TokenKind::Access)?;
        info!(subject = %subject, refresh_jti = %claims.jti, "Access token refreshed");
        Ok(access_token)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn decode_claims(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?
            .claims;

        if claims.kind != expected {
            return Err(TokenError::WrongTokenKind {
                expected,
                actual: claims.kind,
            });
        }
        if claims.subject().is_none() {
            return Err(TokenError::InvalidClaims {
                claim: "sub".to_string(),
            });
        }

        let now = self.clock.now().timestamp();
        let leeway = i64::try_from(self.config.leeway).unwrap_or(i64::MAX);

        if claims.iat > now.saturating_add(self.config.max_issued_at_skew.num_seconds()) {
            return Err(TokenError::InvalidClaims {
                claim: "iat".to_string(),
            });
        }
        if now >= claims.exp.saturating_add(leeway) {
            return Err(TokenError::TokenExpired);
        }
        if now.saturating_add(leeway) < claims.nbf {
            return Err(TokenError::TokenNotYetValid);
        }

        Ok(claims)
    }
}

fn map_decode_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidIssuer => TokenError::InvalidClaims {
            claim: "iss".to_string(),
        },
        ErrorKind::InvalidAudience => TokenError::InvalidClaims {
            claim: "aud".to_string(),
        },
        ErrorKind::MissingRequiredClaim(claim) => TokenError::InvalidClaims {
            claim: claim.clone(),
        },
        _ => TokenError::InvalidTokenFormat,
    }
}

/// Short SHA-256 fingerprint of a token, safe to log
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}
