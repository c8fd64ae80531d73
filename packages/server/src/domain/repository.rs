//! Collaborator traits the use cases depend on.
//!
//! The domain layer owns these abstractions; infrastructure provides the
//! implementations (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{Identity, Message},
    error::{AuthError, RepositoryError},
    value_object::{ClassId, MessageContent, MessageId, UserId},
};

/// Validates a bearer credential and resolves the caller's identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Answers whether a user belongs to a class.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassMembershipRepository: Send + Sync {
    async fn is_member(&self, user_id: UserId, class_id: ClassId) -> Result<bool, RepositoryError>;
}

/// Message storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message and return its enriched, display-ready form.
    async fn insert(
        &self,
        user_id: UserId,
        class_id: ClassId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// The most recent `limit` messages of a class, oldest first.
    async fn recent(&self, class_id: ClassId, limit: usize) -> Result<Vec<Message>, RepositoryError>;

    async fn delete(&self, message_id: MessageId) -> Result<(), RepositoryError>;
}

/// Fans a persisted message out to the live members of its class.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBroadcaster: Send + Sync {
    /// Never blocks on slow receivers.
    async fn publish(&self, class_id: ClassId, message: Message);
}
