//! Entities of the chat room domain.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    error::ValueObjectError,
    value_object::{DisplayName, MessageId, Timestamp},
};

/// Author role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl FromStr for Role {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(ValueObjectError::UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message. Identity is `id`; every other field may be replaced by a
/// later upsert carrying the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub content: String,
    pub user: String,
    pub role: Role,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        content: String,
        user: String,
        role: Role,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            content,
            user,
            role,
            timestamp,
        }
    }
}

/// Name a connection has taken, and when it first took one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

/// One live socket in a room.
///
/// `seq` is the registration order inside the room and breaks ties between
/// identical `joined_at` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub seq: u64,
    pub presence: Option<Presence>,
}

impl Connection {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            presence: None,
        }
    }

    pub fn display_name(&self) -> Option<&DisplayName> {
        self.presence.as_ref().map(|p| &p.display_name)
    }
}
