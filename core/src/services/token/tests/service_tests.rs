//! Unit tests for token service

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::domain::entities::token::TokenKind;
use crate::domain::entities::{Entity, User};
use crate::domain::value_objects::Identifier;
use crate::errors::TokenError;
use crate::services::token::{Clock, SigningKeys, TokenService, TokenServiceConfig};

use super::{corrupt_signature, hs256_service, hs256_service_with};

fn test_user() -> User {
    User::register("hashed_phone", "+61").unwrap()
}

fn payload(token: &str) -> serde_json::Value {
    let segment = token.split('.').nth(1).unwrap();
    let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_access_token_round_trip() {
    let (service, _clock) = hs256_service();
    let user = test_user();

    let token = service.issue_access_token(&user).unwrap();

    assert_eq!(token.split('.').count(), 3);
    assert!(service.validate(&token, TokenKind::Access));
    assert!(service.validate_access(&token));
    assert_eq!(service.extract_subject(&token, TokenKind::Access), Some(user.id()));
    assert_eq!(service.access_subject(&token), Some(user.id()));
}

#[test]
fn test_claims_payload() {
    let (service, _clock) = hs256_service();
    let user = test_user();

    let token = service.issue_access_token(&user).unwrap();
    let claims = payload(&token);

    assert_eq!(claims["sub"], serde_json::json!(user.id().to_string()));
    assert_eq!(claims["token_type"], serde_json::json!("access"));
    assert_eq!(claims["iss"], serde_json::json!("eventide"));
    assert_eq!(claims["aud"], serde_json::json!("eventide-api"));
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        15 * 60
    );
    assert!(claims.get("phone_hash").is_none());
}

#[test]
fn test_token_pair() {
    let (service, _clock) = hs256_service();
    let user = test_user();

    let pair = service.issue_token_pair(&user).unwrap();

    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    assert!(service.validate(&pair.access_token, TokenKind::Access));
    assert!(service.validate(&pair.refresh_token, TokenKind::Refresh));
    assert_ne!(pair.access_token, pair.refresh_token);
}

#[test]
fn test_each_token_has_unique_id() {
    let (service, _clock) = hs256_service();
    let user = test_user();

    let first = service.issue_access_token(&user).unwrap();
    let second = service.issue_access_token(&user).unwrap();

    assert_ne!(payload(&first)["jti"], payload(&second)["jti"]);
}

#[test]
fn test_access_token_expires() {
    let (service, clock) = hs256_service();
    let user = test_user();
    let token = service.issue_access_token(&user).unwrap();

    clock.advance(Duration::minutes(14));
    assert!(service.validate_access(&token));

    clock.advance(Duration::minutes(2));
    assert!(!service.validate(&token, TokenKind::Access));
    assert_eq!(service.extract_subject(&token, TokenKind::Access), None);
    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::TokenExpired)
    );
}

#[test]
fn test_refresh_token_outlives_access_token() {
    let (service, clock) = hs256_service();
    let pair = service.issue_token_pair(&test_user()).unwrap();

    clock.advance(Duration::days(6));
    assert!(!service.validate_access(&pair.access_token));
    assert!(service.validate(&pair.refresh_token, TokenKind::Refresh));

    clock.advance(Duration::days(2));
    assert!(!service.validate(&pair.refresh_token, TokenKind::Refresh));
}

#[test]
fn test_refresh_token_rejected_as_access_token() {
    let (service, _clock) = hs256_service();
    let user = test_user();
    let refresh = service.issue_refresh_token(&user).unwrap();

    assert!(!service.validate(&refresh, TokenKind::Access));
    assert_eq!(service.access_subject(&refresh), None);
    assert_eq!(
        service.inspect(&refresh, TokenKind::Access),
        Err(TokenError::WrongTokenKind {
            expected: TokenKind::Access,
            actual: TokenKind::Refresh,
        })
    );
}

#[test]
fn test_corrupted_signature_rejected() {
    let (service, _clock) = hs256_service();
    let token = service.issue_access_token(&test_user()).unwrap();

    let corrupted = corrupt_signature(&token);

    assert_ne!(corrupted, token);
    assert!(!service.validate_access(&corrupted));
    assert_eq!(service.access_subject(&corrupted), None);
}

#[test]
fn test_fixed_identifier_scenario() {
    let (service, _clock) = hs256_service();
    let id = Identifier::parse("11111111-1111-1111-1111-111111111111").unwrap();
    let user = User::register_with_id(id, "hashed_phone", "+1").unwrap();

    let token = service.issue_access_token(&user).unwrap();

    assert!(service.validate(&token, TokenKind::Access));
    assert_eq!(service.extract_subject(&token, TokenKind::Access), Some(id));
    assert!(!service.validate(&corrupt_signature(&token), TokenKind::Access));
}

#[test]
fn test_malformed_input_is_invalid() {
    let (service, _clock) = hs256_service();

    for input in ["", "not-a-token", "a.b.c", "...", "eyJhbGciOiJIUzI1NiJ9.e30"] {
        assert!(!service.validate_access(input), "accepted {:?}", input);
        assert_eq!(service.access_subject(input), None);
    }
    assert_eq!(
        service.inspect("not-a-token", TokenKind::Access),
        Err(TokenError::InvalidTokenFormat)
    );
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let (service, _clock) = hs256_service();
    let other = TokenService::new(
        SigningKeys::from_secret(b"a-completely-different-secret-of-32-bytes").unwrap(),
        TokenServiceConfig::default(),
    )
    .unwrap();

    let token = other.issue_access_token(&test_user()).unwrap();

    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_issuer_and_audience_enforced() {
    let (service, _clock) = hs256_service();
    let (other_issuer, _) = hs256_service_with(TokenServiceConfig {
        issuer: "someone-else".to_string(),
        ..TokenServiceConfig::default()
    });
    let (other_audience, _) = hs256_service_with(TokenServiceConfig {
        audience: "another-api".to_string(),
        ..TokenServiceConfig::default()
    });
    let user = test_user();

    let token = other_issuer.issue_access_token(&user).unwrap();
    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::InvalidClaims {
            claim: "iss".to_string()
        })
    );

    let token = other_audience.issue_access_token(&user).unwrap();
    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::InvalidClaims {
            claim: "aud".to_string()
        })
    );
}

#[test]
fn test_not_yet_valid_and_future_issue_time() {
    let (service, clock) = hs256_service();
    let start = clock.now();
    let token = service.issue_access_token(&test_user()).unwrap();

    clock.set(start - Duration::minutes(1));
    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::TokenNotYetValid)
    );

    clock.set(start - Duration::minutes(10));
    assert_eq!(
        service.inspect(&token, TokenKind::Access),
        Err(TokenError::InvalidClaims {
            claim: "iat".to_string()
        })
    );
}

#[test]
fn test_leeway_extends_expiry() {
    let (service, clock) = hs256_service_with(TokenServiceConfig {
        leeway: 60,
        ..TokenServiceConfig::default()
    });
    let token = service.issue_access_token(&test_user()).unwrap();

    clock.advance(Duration::minutes(15) + Duration::seconds(30));
    assert!(service.validate_access(&token));

    clock.advance(Duration::seconds(60));
    assert!(!service.validate_access(&token));
}

#[test]
fn test_exchange_refresh_token() {
    let (service, clock) = hs256_service();
    let user = test_user();
    let pair = service.issue_token_pair(&user).unwrap();

    clock.advance(Duration::hours(1));
    assert!(!service.validate_access(&pair.access_token));

    let access = service.exchange_refresh_token(&pair.refresh_token).unwrap();
    assert_eq!(service.access_subject(&access), Some(user.id()));
}

#[test]
fn test_exchange_rejects_access_token() {
    let (service, _clock) = hs256_service();
    let access = service.issue_access_token(&test_user()).unwrap();

    assert_eq!(
        service.exchange_refresh_token(&access),
        Err(TokenError::WrongTokenKind {
            expected: TokenKind::Refresh,
            actual: TokenKind::Access,
        })
    );
}

#[test]
fn test_algorithm_must_match_keys() {
    let keys = SigningKeys::from_secret(super::TEST_SECRET).unwrap();
    let config = TokenServiceConfig {
        algorithm: Algorithm::RS256,
        ..TokenServiceConfig::default()
    };

    assert!(matches!(
        TokenService::new(keys, config),
        Err(TokenError::KeyLoadError { .. })
    ));
}

#[test]
fn test_unrepresentable_lifetime_fails_to_issue() {
    let (service, _clock) = hs256_service_with(TokenServiceConfig {
        refresh_token_lifetime: Duration::try_seconds(i64::MAX / 1000).unwrap(),
        ..TokenServiceConfig::default()
    });
    let user = test_user();

    assert_eq!(
        service.issue(user.id(), TokenKind::Refresh),
        Err(TokenError::TokenGenerationFailed)
    );
    assert!(service.issue(user.id(), TokenKind::Access).is_ok());
}
