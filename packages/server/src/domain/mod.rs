//! Domain layer: chat room model, presence rules and the ports the room
//! coordinator depends on.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod presence;
pub mod repository;
pub mod room_state;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Presence, Role};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::{PresenceEvent, RoomNotification, UpsertKind};
pub use presence::{ConnectionMap, PresenceTransitions};
pub use repository::MessageStore;
pub use room_state::{RoomSnapshot, RoomState, UpsertOutcome};
pub use value_object::{ConnectionId, DisplayName, MessageId, RoomId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockMessageStore;
