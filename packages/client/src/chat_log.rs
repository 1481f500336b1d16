//! Local view of a room, reconciled from server events.

use std::collections::HashSet;

use hiroba_server::infrastructure::dto::websocket::{ChatMessageDto, OutboundEvent};

/// What an event did to the local view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogChange {
    /// The whole history was replaced
    Reset,
    /// A message the view did not have was appended
    Appended(ChatMessageDto),
    /// A message was replaced in place
    Replaced(ChatMessageDto),
    /// The server echoed a message this session sent
    Confirmed(ChatMessageDto),
    /// An update for a message the view does not have
    Ignored,
    /// The online list changed
    Users,
    /// Informational presence notice
    Notice,
}

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessageDto>,
    online_users: Vec<String>,
    /// IDs sent from this session that the server has not echoed yet
    pending: HashSet<String>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessageDto] {
        &self.messages
    }

    pub fn online_users(&self) -> &[String] {
        &self.online_users
    }

    /// Apply one server event
    pub fn apply(&mut self, event: OutboundEvent) -> LogChange {
        match event {
            OutboundEvent::All { messages } => {
                self.messages = messages;
                self.pending.clear();
                LogChange::Reset
            }
            OutboundEvent::Add(message) => self.upsert(message),
            OutboundEvent::Update(message) => match self.position(&message.id) {
                Some(_) => self.upsert(message),
                None => LogChange::Ignored,
            },
            OutboundEvent::Users { users } => {
                self.online_users = users;
                LogChange::Users
            }
            OutboundEvent::System { .. } => LogChange::Notice,
        }
    }

    /// Show a message we just sent before the server echoes it back.
    /// The echo replaces it in place and is reported as [`LogChange::Confirmed`].
    pub fn apply_local(&mut self, message: ChatMessageDto) -> LogChange {
        let id = message.id.clone();
        let change = self.upsert(message);
        self.pending.insert(id);
        change
    }

    fn upsert(&mut self, message: ChatMessageDto) -> LogChange {
        match self.position(&message.id) {
            Some(index) => {
                self.messages[index] = message.clone();
                if self.pending.remove(&message.id) {
                    LogChange::Confirmed(message)
                } else {
                    LogChange::Replaced(message)
                }
            }
            None => {
                self.messages.push(message.clone());
                LogChange::Appended(message)
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }
}
