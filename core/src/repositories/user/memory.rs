//! In-memory user store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Entity, User, UserSnapshot};
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;
use crate::repositories::ChangeStore;

/// Keeps user snapshots in process memory
///
/// Commits are all-or-nothing: an entity that is not a [`User`] fails the
/// whole commit before anything is written.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Identifier, UserSnapshot>>>,
    fail_next_commit: Arc<AtomicBool>,
    commits: Arc<AtomicUsize>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail with a storage error
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Loads a stored user; the restored entity has no pending events
    pub async fn find_by_id(&self, id: Identifier) -> Option<User> {
        self.users.read().await.get(&id).cloned().map(User::restore)
    }

    pub async fn snapshot(&self, id: Identifier) -> Option<UserSnapshot> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChangeStore for InMemoryUserStore {
    async fn commit(&self, changes: &[&dyn Entity]) -> Result<u64, DomainError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Storage {
                message: "injected commit failure".to_string(),
            });
        }

        let snapshots = changes
            .iter()
            .map(|entity| {
                entity
                    .downcast_ref::<User>()
                    .map(User::snapshot)
                    .ok_or_else(|| DomainError::Storage {
                        message: format!("unsupported entity type: {}", entity.entity_type()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut users = self.users.write().await;
        for snapshot in &snapshots {
            users.insert(snapshot.id, snapshot.clone());
        }
        self.commits.fetch_add(1, Ordering::SeqCst);

        Ok(snapshots.len() as u64)
    }
}
