//! Storage contracts and in-memory implementations.

pub mod audit;
pub mod store;
pub mod token;
pub mod user;

pub use audit::{AuditLogRepository, MockAuditLogRepository, NoOpAuditLogRepository};
pub use store::ChangeStore;
pub use token::{InMemoryRevokedTokenRepository, RevokedTokenRepository};
pub use user::InMemoryUserStore;
