//! Tests for token revocation

use std::sync::Arc;

use chrono::Duration;

use crate::domain::entities::token::TokenKind;
use crate::domain::entities::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::InMemoryRevokedTokenRepository;
use crate::services::token::{ManualClock, TokenRevocationService, TokenService};

use super::hs256_service;

fn setup() -> (
    TokenRevocationService<InMemoryRevokedTokenRepository>,
    Arc<TokenService>,
    Arc<ManualClock>,
    InMemoryRevokedTokenRepository,
) {
    let (service, clock) = hs256_service();
    let service = Arc::new(service);
    let repository = InMemoryRevokedTokenRepository::new();
    let revocation = TokenRevocationService::new(service.clone(), repository.clone());
    (revocation, service, clock, repository)
}

fn user() -> User {
    User::register("hashed_phone", "+61").unwrap()
}

#[tokio::test]
async fn test_revoked_access_token_is_inactive() {
    let (revocation, service, _clock, _repo) = setup();
    let user = user();
    let revoked = service.issue_access_token(&user).unwrap();
    let other = service.issue_access_token(&user).unwrap();

    assert!(revocation.is_active(&revoked, TokenKind::Access).await);

    revocation.revoke(&revoked).await.unwrap();

    assert!(!revocation.is_active(&revoked, TokenKind::Access).await);
    assert!(matches!(
        revocation.check(&revoked, TokenKind::Access).await,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
    assert!(revocation.is_active(&other, TokenKind::Access).await);
    // the stateless service still accepts the signature
    assert!(service.validate_access(&revoked));
}

#[tokio::test]
async fn test_revoke_refresh_token() {
    let (revocation, service, _clock, _repo) = setup();
    let refresh = service.issue_refresh_token(&user()).unwrap();

    revocation.revoke(&refresh).await.unwrap();

    assert!(!revocation.is_active(&refresh, TokenKind::Refresh).await);
}

#[tokio::test]
async fn test_revoking_expired_token_is_a_no_op() {
    let (revocation, service, clock, repo) = setup();
    let token = service.issue_access_token(&user()).unwrap();

    clock.advance(Duration::minutes(20));
    revocation.revoke(&token).await.unwrap();

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_revoking_invalid_token_fails() {
    let (revocation, _service, _clock, repo) = setup();

    let result = revocation.revoke("garbage").await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_purge_expired_entries() {
    let (revocation, service, clock, repo) = setup();
    let pair = service.issue_token_pair(&user()).unwrap();

    revocation.revoke(&pair.access_token).await.unwrap();
    revocation.revoke(&pair.refresh_token).await.unwrap();
    assert_eq!(repo.len().await, 2);

    clock.advance(Duration::hours(1));
    assert_eq!(revocation.purge_expired().await.unwrap(), 1);
    assert_eq!(repo.len().await, 1);
    assert!(!revocation.is_active(&pair.refresh_token, TokenKind::Refresh).await);
}
