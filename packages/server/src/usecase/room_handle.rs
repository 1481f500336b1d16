//! Room handle: the only way other tasks talk to a room coordinator.
//!
//! Commands go through an unbounded channel, so every handler enqueues without
//! waiting and the coordinator sees them in arrival order.

use tokio::sync::{mpsc, oneshot};

use crate::domain::{
    ChatMessage, ConnectionId, DisplayName, PusherChannel, RoomId, RoomSnapshot, UpsertKind,
};

use super::error::RoomError;

/// Event a client sent over its connection, already decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// Raw requested name; the coordinator validates it
    SetName(String),
    Upsert {
        kind: UpsertKind,
        message: ChatMessage,
    },
}

pub enum RoomCommand {
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Event {
        connection_id: ConnectionId,
        event: RoomEvent,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    NameTaken {
        name: DisplayName,
        reply: oneshot::Sender<bool>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    tx: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    pub(crate) fn new(room_id: RoomId, tx: mpsc::UnboundedSender<RoomCommand>) -> Self {
        Self { room_id, tx }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.tx
            .send(command)
            .map_err(|_| RoomError::Closed(self.room_id.clone()))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make(reply_tx))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Closed(self.room_id.clone()))
    }

    /// Register a new socket; it receives the full history
    pub fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Connect {
            connection_id,
            sender,
        })
    }

    pub fn send_event(&self, connection_id: ConnectionId, event: RoomEvent) -> Result<(), RoomError> {
        self.send(RoomCommand::Event {
            connection_id,
            event,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { connection_id })
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Whether a live connection in this room currently uses `name`
    pub async fn is_name_taken(&self, name: DisplayName) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::NameTaken { name, reply })
            .await
    }

    /// Wait until every command sent before this call has been processed and
    /// its persistence attempted
    pub async fn flush(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Flush { reply }).await
    }
}
