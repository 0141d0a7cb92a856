//! Audit log repository trait defining the interface for audit log persistence.

use async_trait::async_trait;

use crate::domain::entities::audit::AuditLog;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;

/// Repository trait for AuditLog persistence operations
///
/// Called from the post-commit dispatch path, so implementations should keep
/// writes short.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Create a new audit log entry
    ///
    /// # Arguments
    /// * `audit_log` - The audit log entry to persist
    ///
    /// # Returns
    /// * `Ok(())` on successful creation
    /// * `Err(DomainError)` if the operation fails
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError>;

    /// Find audit logs for one entity
    ///
    /// # Arguments
    /// * `entity_id` - The entity to search for
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// * Audit logs for the entity, oldest event first
    async fn find_by_entity(
        &self,
        entity_id: Identifier,
        limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError>;

    /// Total number of stored entries
    async fn count(&self) -> Result<usize, DomainError>;
}
