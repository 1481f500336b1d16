//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the room id
    #[error("Room '{0}' was rejected by the server")]
    InvalidRoom(String),

    /// Could not establish a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection went away
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
