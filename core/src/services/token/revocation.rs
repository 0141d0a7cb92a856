//! Token revocation layered over the stateless token service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevokedTokenRepository;

use super::service::{token_fingerprint, TokenService};

/// Checks tokens against a revocation list kept in `R`
pub struct TokenRevocationService<R: RevokedTokenRepository> {
    tokens: Arc<TokenService>,
    repository: R,
}

impl<R: RevokedTokenRepository> TokenRevocationService<R> {
    pub fn new(tokens: Arc<TokenService>, repository: R) -> Self {
        Self { tokens, repository }
    }

    /// Revokes a token of either kind until it would have expired
    ///
    /// Expired tokens are accepted and ignored since they are already unusable.
    ///
    /// # Errors
    ///
    /// * `DomainError::Token` - the token is malformed or not signed by this service
    /// * `DomainError::Storage` - the revocation could not be recorded
    pub async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        let claims = match self.verified_claims(token) {
            Ok(claims) => claims,
            Err(TokenError::TokenExpired) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let expires_at = claims.expires_at().ok_or_else(|| TokenError::InvalidClaims {
            claim: "exp".to_string(),
        })?;
        self.repository.revoke(&claims.jti, expires_at).await?;

        info!(
            jti = %claims.jti,
            kind = %claims.kind,
            fingerprint = %token_fingerprint(token),
            "Token revoked"
        );
        Ok(())
    }

    /// Verifies `token` as `kind` and rejects it if revoked
    pub async fn check(&self, token: &str, kind: TokenKind) -> Result<Claims, DomainError> {
        let claims = self.tokens.inspect(token, kind)?;
        if self.repository.is_revoked(&claims.jti).await? {
            return Err(TokenError::TokenRevoked.into());
        }
        Ok(claims)
    }

    /// Whether `token` is valid as `kind` and not revoked
    ///
    /// A failing revocation lookup counts as inactive.
    pub async fn is_active(&self, token: &str, kind: TokenKind) -> bool {
        match self.check(token, kind).await {
            Ok(_) => true,
            Err(DomainError::Token(_)) => false,
            Err(e) => {
                warn!(error = %e, "Revocation lookup failed; treating token as inactive");
                false
            }
        }
    }

    /// Drops revocation entries for tokens that have expired anyway
    pub async fn purge_expired(&self) -> Result<usize, DomainError> {
        let purged = self.repository.purge_expired(self.tokens.now()).await?;
        if purged > 0 {
            info!(purged, "Expired revocation entries purged");
        }
        Ok(purged)
    }

    // revocation accepts either kind
    fn verified_claims(&self, token: &str) -> Result<Claims, TokenError> {
        match self.tokens.inspect(token, TokenKind::Access) {
            Err(TokenError::WrongTokenKind { .. }) => self.tokens.inspect(token, TokenKind::Refresh),
            other => other,
        }
    }
}
