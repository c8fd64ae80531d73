//! Core domain models for the class chat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_object::{ClassId, MessageContent, MessageId, UserId};

/// Role of a school member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

/// Authenticated caller, as resolved from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
}

impl Identity {
    /// Create a new identity
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
        }
    }
}

/// Display-ready author details attached to a persisted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

/// A persisted chat message in its enriched form.
///
/// Messages are immutable once stored; the hub only ever forwards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: MessageContent,
    pub class_id: ClassId,
    pub class_name: String,
    pub author: Author,
    /// Optional attachment reference
    pub file_url: Option<String>,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
