//! Error types of the domain layer.

use thiserror::Error;

/// Validation errors raised when constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("room id is too long ({0} bytes)")]
    RoomIdTooLong(usize),

    #[error("room id contains invalid character '{0}'")]
    RoomIdInvalidCharacter(char),

    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("display name must not be empty")]
    DisplayNameEmpty,

    #[error("message id must not be empty")]
    MessageIdEmpty,

    #[error("unknown message role '{0}'")]
    UnknownRole(String),
}

/// Errors raised by message store implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The storage backend rejected or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted row could not be turned back into a message
    #[error("corrupt row for message '{id}': {reason}")]
    CorruptRow { id: String, reason: String },
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("failed to push event: {0}")]
    PushFailed(String),
}
