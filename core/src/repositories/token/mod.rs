//! Revoked token repository module.

mod r#trait;
pub use r#trait::RevokedTokenRepository;

mod memory;
pub use memory::InMemoryRevokedTokenRepository;
