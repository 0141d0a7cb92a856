mod revocation_tests;
mod service_tests;

use std::sync::Arc;

use crate::services::token::{ManualClock, SigningKeys, TokenService, TokenServiceConfig};

pub(super) const TEST_SECRET: &[u8] = b"test-secret-key-for-unit-tests-only-32b";

/// HS256 service driven by a manual clock
pub(super) fn hs256_service() -> (TokenService, Arc<ManualClock>) {
    hs256_service_with(TokenServiceConfig::default())
}

pub(super) fn hs256_service_with(config: TokenServiceConfig) -> (TokenService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let keys = SigningKeys::from_secret(TEST_SECRET).unwrap();
    let service = TokenService::new(keys, config)
        .unwrap()
        .with_clock(clock.clone());
    (service, clock)
}

/// Replaces one character in the middle of the signature segment
pub(super) fn corrupt_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    let middle = chars.len() / 2;
    chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}
