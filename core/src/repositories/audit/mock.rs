//! Mock implementation of AuditLogRepository for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::entities::audit::AuditLog;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;

use super::AuditLogRepository;

/// Mock implementation of AuditLogRepository for testing
#[derive(Clone)]
pub struct MockAuditLogRepository {
    logs: Arc<Mutex<Vec<AuditLog>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockAuditLogRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *lock(&self.should_fail) = should_fail;
    }

    /// Get all stored logs in insertion order
    pub fn get_all_logs(&self) -> Vec<AuditLog> {
        lock(&self.logs).clone()
    }

    /// Clear all logs
    pub fn clear(&self) {
        lock(&self.logs).clear();
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if *lock(&self.should_fail) {
            return Err(DomainError::Storage {
                message: "Mock repository error".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockAuditLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        self.check_failure()?;
        lock(&self.logs).push(audit_log.clone());
        Ok(())
    }

    async fn find_by_entity(
        &self,
        entity_id: Identifier,
        limit: usize,
    ) -> Result<Vec<AuditLog>, DomainError> {
        self.check_failure()?;

        let mut result: Vec<AuditLog> = lock(&self.logs)
            .iter()
            .filter(|log| log.entity_id == entity_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));
        result.truncate(limit);
        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.check_failure()?;
        Ok(lock(&self.logs).len())
    }
}

// a panicking test thread must not hide the logs from the others
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
