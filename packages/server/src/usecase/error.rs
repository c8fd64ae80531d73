//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{AuthError, RepositoryError};

/// Errors that abort a connection attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Credential missing or rejected; the stream must not be opened.
    #[error("authentication failed: {0}")]
    Unauthenticated(#[from] AuthError),

    /// Valid identity, but not a member of the requested class.
    #[error("Access denied")]
    Forbidden,

    /// The membership lookup itself failed.
    #[error("membership lookup failed: {0}")]
    MembershipLookup(RepositoryError),
}

/// Errors reported back to the sender of a chat message.
///
/// The `Display` text is what the sender receives in its error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("access denied to class")]
    AccessDenied,

    #[error("failed to save message")]
    Persistence(RepositoryError),
}
