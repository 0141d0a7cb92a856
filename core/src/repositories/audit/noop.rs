//! No-op implementation of AuditLogRepository for when audit logging is not needed

use async_trait::async_trait;

use crate::domain::entities::audit::AuditLog;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;

use super::AuditLogRepository;

/// Discards every entry
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditLogRepository;

impl NoOpAuditLogRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogRepository for NoOpAuditLogRepository {
    async fn create(&self, _audit_log: &AuditLog) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find_by_entity(
        &self,
        _entity_id: Identifier,
        _limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}
