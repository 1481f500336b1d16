//! WebSocket wire format.
//!
//! Every frame is a JSON object tagged by `type`. Unknown tags or missing
//! fields fail to deserialize and the frame is dropped by the handler.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// A chat message as it travels on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub content: String,
    pub user: String,
    pub role: Role,
    pub timestamp: i64,
}

/// Client → server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundEvent {
    #[serde(rename = "setName")]
    SetName { name: String },
    #[serde(rename = "add")]
    Add(ChatMessageDto),
    #[serde(rename = "update")]
    Update(ChatMessageDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemEventKind {
    Join,
    Leave,
}

/// Server → client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundEvent {
    All { messages: Vec<ChatMessageDto> },
    Add(ChatMessageDto),
    Update(ChatMessageDto),
    Users { users: Vec<String> },
    System { event: SystemEventKind, user: String },
}
