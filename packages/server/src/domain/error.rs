//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId must be positive
    #[error("UserId must be positive (got {0})")]
    UserIdNotPositive(i64),

    /// ClassId must be positive
    #[error("ClassId must be positive (got {0})")]
    ClassIdNotPositive(i64),

    /// ClassId is not an integer
    #[error("ClassId must be an integer (got: {0})")]
    ClassIdInvalidFormat(String),

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors produced while validating a bearer credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingCredential,

    #[error("invalid authorization header format")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token has expired")]
    ExpiredToken,
}

/// Errors returned by storage collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("class not found: {0}")]
    ClassNotFound(i64),

    #[error("message not found: {0}")]
    MessageNotFound(i64),

    #[error("storage failure: {0}")]
    Storage(String),
}
