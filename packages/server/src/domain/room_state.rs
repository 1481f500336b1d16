//! Room state: message log and connection map of a single room.
//!
//! Only the room coordinator owns a `RoomState`; nothing here is synchronized.

use std::collections::HashMap;

use serde::Serialize;

use super::{
    entity::{ChatMessage, Connection, Presence},
    presence::{self, ConnectionMap, PresenceTransitions},
    value_object::{ConnectionId, DisplayName, MessageId, RoomId, Timestamp},
};

/// Result of upserting a message into the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was new and the message was appended
    Inserted,
    /// An entry with the same id was replaced in place
    Replaced,
    /// An identical entry already existed
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: RoomId,
    pub created_at: Timestamp,
    /// First-seen order; updates never move an entry
    messages: Vec<ChatMessage>,
    /// Position of each message id in `messages`
    positions: HashMap<MessageId, usize>,
    connections: ConnectionMap,
    next_seq: u64,
}

impl RoomState {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            messages: Vec::new(),
            positions: HashMap::new(),
            connections: ConnectionMap::new(),
            next_seq: 0,
        }
    }

    /// Build a room from persisted history.
    ///
    /// Duplicate ids collapse onto the first position, keeping the last fields.
    pub fn hydrate(id: RoomId, created_at: Timestamp, history: Vec<ChatMessage>) -> Self {
        let mut state = Self::new(id, created_at);
        for message in history {
            state.upsert_message(message);
        }
        state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.positions.get(id).map(|&index| &self.messages[index])
    }

    /// Insert the message, or replace the entry carrying the same id in place
    pub fn upsert_message(&mut self, message: ChatMessage) -> UpsertOutcome {
        match self.positions.get(&message.id) {
            Some(&index) => {
                if self.messages[index] == message {
                    UpsertOutcome::Unchanged
                } else {
                    self.messages[index] = message;
                    UpsertOutcome::Replaced
                }
            }
            None => {
                self.positions.insert(message.id.clone(), self.messages.len());
                self.messages.push(message);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn connections(&self) -> &ConnectionMap {
        &self.connections
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Every live connection, named or not, in registration order
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<(&ConnectionId, u64)> = self
            .connections
            .iter()
            .map(|(id, connection)| (id, connection.seq))
            .collect();
        ids.sort_by_key(|(_, seq)| *seq);
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Register a socket without a name.
    ///
    /// Returns `false` if the connection was already registered.
    pub fn register_connection(&mut self, connection_id: ConnectionId) -> bool {
        if self.connections.contains_key(&connection_id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.connections.insert(connection_id, Connection::new(seq));
        true
    }

    /// Give a registered connection a display name.
    ///
    /// The first name sets `joined_at` to `now`; later renames keep it.
    /// Returns `None` when the connection is not registered.
    pub fn set_display_name(
        &mut self,
        connection_id: &ConnectionId,
        display_name: DisplayName,
        now: Timestamp,
    ) -> Option<PresenceTransitions> {
        let before = self.connections.clone();
        let connection = self.connections.get_mut(connection_id)?;

        let joined_at = connection
            .presence
            .as_ref()
            .map(|p| p.joined_at)
            .unwrap_or(now);
        connection.presence = Some(Presence {
            display_name,
            joined_at,
        });

        Some(presence::compute_transitions(&before, &self.connections))
    }

    /// Remove a connection.
    ///
    /// Returns `None` when the connection was not registered, so repeated
    /// disconnects are harmless.
    pub fn remove_connection(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Option<PresenceTransitions> {
        let before = self.connections.clone();
        self.connections.remove(connection_id)?;
        Some(presence::compute_transitions(&before, &self.connections))
    }

    pub fn online_names(&self) -> Vec<DisplayName> {
        presence::compute_online_names(&self.connections)
    }

    /// Whether a live connection currently uses `name`
    pub fn is_name_taken(&self, name: &DisplayName) -> bool {
        presence::is_present(&self.connections, name)
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            online_users: self.online_names(),
            connection_count: self.connection_count(),
            messages: self.messages.clone(),
        }
    }
}

/// Read-only copy of a room for inspection endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub online_users: Vec<DisplayName>,
    pub connection_count: usize,
    pub messages: Vec<ChatMessage>,
}
