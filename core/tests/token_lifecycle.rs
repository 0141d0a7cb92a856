//! Token issuing and checking wired from application configuration

use std::sync::Arc;

use chrono::Duration;
use et_shared::config::{AppConfig, AuthConfig, Environment, JwtConfig};

use et_core::domain::entities::{Entity, TokenKind, User};
use et_core::domain::value_objects::Identifier;
use et_core::errors::{DomainError, TokenError};
use et_core::repositories::InMemoryRevokedTokenRepository;
use et_core::services::token::{
    ManualClock, SigningKeys, TokenRevocationService, TokenService, TokenServiceConfig,
};

const PRODUCTION_SECRET: &str = "integration-secret-with-at-least-32-bytes";

fn production_config() -> AppConfig {
    AppConfig {
        environment: Environment::Production,
        auth: AuthConfig {
            jwt: JwtConfig::new(PRODUCTION_SECRET),
        },
        ..AppConfig::default()
    }
}

fn service_from(config: &AppConfig) -> (TokenService, Arc<ManualClock>) {
    let keys = SigningKeys::from_jwt_config(&config.auth.jwt, config.environment).unwrap();
    let settings = TokenServiceConfig::from_jwt_config(&config.auth.jwt).unwrap();
    let clock = Arc::new(ManualClock::starting_now());
    let service = TokenService::new(keys, settings)
        .unwrap()
        .with_clock(clock.clone());
    (service, clock)
}

fn tamper(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    let middle = chars.len() / 2;
    chars[middle] = if chars[middle] == 'x' { 'y' } else { 'x' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}

#[test]
fn default_secret_is_refused_in_production() {
    let config = AppConfig {
        environment: Environment::Production,
        ..AppConfig::default()
    };

    assert!(config.has_insecure_secret());
    assert!(matches!(
        SigningKeys::from_jwt_config(&config.auth.jwt, config.environment),
        Err(TokenError::KeyLoadError { .. })
    ));
}

#[test]
fn access_token_lifecycle() {
    let (service, clock) = service_from(&production_config());
    let user = User::register("hashed_phone", "+61").unwrap();

    let pair = service.issue_token_pair(&user).unwrap();
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 604_800);
    assert_eq!(service.access_subject(&pair.access_token), Some(user.id()));

    // the two kinds are not interchangeable
    assert!(!service.validate_access(&pair.refresh_token));
    assert!(matches!(
        service.inspect(&pair.access_token, TokenKind::Refresh),
        Err(TokenError::WrongTokenKind { .. })
    ));

    clock.advance(Duration::minutes(16));
    assert_eq!(
        service.inspect(&pair.access_token, TokenKind::Access),
        Err(TokenError::TokenExpired)
    );

    // a refresh token is still good and yields a fresh access token
    let renewed = service.exchange_refresh_token(&pair.refresh_token).unwrap();
    assert_eq!(service.access_subject(&renewed), Some(user.id()));
}

#[test]
fn tampered_token_yields_no_subject() {
    let (service, _clock) = service_from(&production_config());
    let id = Identifier::parse("11111111-1111-1111-1111-111111111111").unwrap();
    let token = service.issue(id, TokenKind::Access).unwrap();

    assert_eq!(service.access_subject(&token), Some(id));
    assert_eq!(service.access_subject(&tamper(&token)), None);
}

#[test]
fn tokens_from_another_deployment_are_rejected() {
    let (service, _clock) = service_from(&production_config());
    let other = AppConfig {
        auth: AuthConfig {
            jwt: JwtConfig::new("a-different-secret-for-another-deployment"),
        },
        ..production_config()
    };
    let (foreign, _clock) = service_from(&other);

    let token = foreign
        .issue_access_token(&User::register("hashed_phone", "+61").unwrap())
        .unwrap();

    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::InvalidSignature)
    );
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let (service, _clock) = service_from(&production_config());
    let service = Arc::new(service);
    let revocation =
        TokenRevocationService::new(service.clone(), InMemoryRevokedTokenRepository::new());
    let pair = service
        .issue_token_pair(&User::register("hashed_phone", "+61").unwrap())
        .unwrap();

    revocation.revoke(&pair.access_token).await.unwrap();
    revocation.revoke(&pair.refresh_token).await.unwrap();

    assert!(matches!(
        revocation.check(&pair.access_token, TokenKind::Access).await,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
    assert!(!revocation.is_active(&pair.refresh_token, TokenKind::Refresh).await);
}
