//! Revoked token repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Storage for revoked token ids (`jti` claims)
///
/// Entries only need to live until the token would have expired anyway;
/// `purge_expired` removes the rest.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Record `jti` as revoked until `expires_at`
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Whether `jti` has been revoked
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError>;

    /// Drop entries whose token expired at or before `now`
    ///
    /// # Returns
    /// * Number of entries removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
