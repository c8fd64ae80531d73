//! InMemory ClassMembership Repository 実装

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ClassId, ClassMembershipRepository, RepositoryError, UserId};

use super::directory::SchoolDirectory;

/// インメモリ所属 Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryClassMembershipRepository {
    enrollments: RwLock<HashMap<ClassId, HashSet<UserId>>>,
}

impl InMemoryClassMembershipRepository {
    pub fn new(directory: &SchoolDirectory) -> Self {
        let enrollments = directory
            .classes
            .iter()
            .map(|class| (class.id, class.members.iter().copied().collect()))
            .collect();
        Self {
            enrollments: RwLock::new(enrollments),
        }
    }

    /// Enroll a user in a class.
    pub async fn enroll(&self, user_id: UserId, class_id: ClassId) {
        self.enrollments
            .write()
            .await
            .entry(class_id)
            .or_default()
            .insert(user_id);
    }

    /// Remove a user from a class. Open connections are not affected, but
    /// their next message is refused.
    pub async fn withdraw(&self, user_id: UserId, class_id: ClassId) {
        if let Some(members) = self.enrollments.write().await.get_mut(&class_id) {
            members.remove(&user_id);
        }
    }
}

#[async_trait]
impl ClassMembershipRepository for InMemoryClassMembershipRepository {
    async fn is_member(&self, user_id: UserId, class_id: ClassId) -> Result<bool, RepositoryError> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments
            .get(&class_id)
            .is_some_and(|members| members.contains(&user_id)))
    }
}
