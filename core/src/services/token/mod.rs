//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access and refresh token issue and verification
//! - Signing key loading (HS256 secret or RS256 PEM pair)
//! - Revocation on top of an external revocation list

mod clock;
mod config;
mod key_manager;
mod revocation;
mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TokenServiceConfig, MAX_TOKEN_LIFETIME_SECONDS};
pub use key_manager::{KeySource, SigningKeys, MIN_SECRET_LENGTH};
pub use revocation::TokenRevocationService;
pub use service::{token_fingerprint, TokenService};
