//! Events the room coordinator emits towards connections.
//!
//! These are transport-agnostic; the pusher implementation decides how they
//! are encoded on the wire.

use super::{entity::ChatMessage, value_object::DisplayName};

/// Whether a message arrived as a fresh `add` or as an `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Add,
    Update,
}

/// Presence edge transition of a display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    Join,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomNotification {
    /// Full history, sent only to a newly connected socket
    History(Vec<ChatMessage>),
    /// Authoritative copy of an upserted message
    Upserted {
        kind: UpsertKind,
        message: ChatMessage,
    },
    /// Ordered list of names currently online
    OnlineUsers(Vec<DisplayName>),
    /// A name became present or absent
    Presence {
        event: PresenceEvent,
        user: DisplayName,
    },
}
