//! Domain layer for the class chat.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Author, Identity, Message, Role};
pub use error::{AuthError, RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{
    ClassMembershipRepository, CredentialValidator, MessageBroadcaster, MessageRepository,
};
pub use value_object::{
    ClassId, ConnectionId, MAX_MESSAGE_CHARS, MessageContent, MessageId, UserId,
};
