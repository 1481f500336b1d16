//! UseCase: Room Coordinator
//!
//! ルームごとに 1 つだけ存在するアクター。`RoomState` を排他的に所有し、
//! 接続・切断・名前設定・メッセージの upsert を到着順に 1 件ずつ処理する。
//!
//! ## 処理の流れ
//!
//! 1. メモリ上の `RoomState` を更新
//! 2. 更新後の状態から導出したイベントをブロードキャスト
//! 3. 必要なら write-behind キューに永続化を依頼（完了は待たない）
//!
//! 1 件のイベントの失敗はそのイベント内に閉じ込め、Coordinator 自体は止まらない。

use std::sync::Arc;

use hiroba_shared::time::Clock;
use tokio::sync::mpsc;

use crate::domain::{
    ChatMessage, ConnectionId, DisplayName, MessagePusher, PresenceEvent, PresenceTransitions,
    PusherChannel, RoomNotification, RoomState, Timestamp, UpsertKind, UpsertOutcome,
};

use super::{
    room_handle::{RoomCommand, RoomEvent, RoomHandle},
    write_behind::WriteBehind,
};

pub struct RoomCoordinator {
    state: RoomState,
    /// MessagePusher（メッセージ通知の抽象化）
    pusher: Arc<dyn MessagePusher>,
    writer: WriteBehind,
    clock: Arc<dyn Clock>,
}

impl RoomCoordinator {
    pub fn new(
        state: RoomState,
        pusher: Arc<dyn MessagePusher>,
        writer: WriteBehind,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            pusher,
            writer,
            clock,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Move the coordinator onto its own task and return the handle to it
    pub fn spawn(self) -> RoomHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = RoomHandle::new(self.state.id.clone(), tx);
        tokio::spawn(self.run(rx));
        handle
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RoomCommand>) {
        tracing::info!("Room '{}' coordinator started", self.state.id);
        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }
        tracing::info!("Room '{}' coordinator stopped", self.state.id);
    }

    pub async fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Connect {
                connection_id,
                sender,
            } => self.on_connect(connection_id, sender).await,
            RoomCommand::Event {
                connection_id,
                event,
            } => match event {
                RoomEvent::SetName(name) => self.on_set_name(&connection_id, name).await,
                RoomEvent::Upsert { kind, message } => {
                    self.on_upsert(&connection_id, kind, message).await
                }
            },
            RoomCommand::Disconnect { connection_id } => self.on_disconnect(&connection_id).await,
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
            RoomCommand::NameTaken { name, reply } => {
                let _ = reply.send(self.state.is_name_taken(&name));
            }
            RoomCommand::Flush { reply } => self.writer.flush_then_reply(reply),
        }
    }

    /// Register the socket unnamed and send it the full history. Nobody else
    /// is told.
    pub async fn on_connect(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        if !self.state.register_connection(connection_id.clone()) {
            tracing::warn!(
                "Connection '{}' is already registered in room '{}'",
                connection_id,
                self.state.id
            );
            return;
        }
        self.pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let history = RoomNotification::History(self.state.messages().to_vec());
        if let Err(e) = self.pusher.push_to(&connection_id, &history).await {
            tracing::warn!("Failed to send history to '{}': {}", connection_id, e);
        }
        tracing::info!(
            "Connection '{}' joined room '{}' ({} connections)",
            connection_id,
            self.state.id,
            self.state.connection_count()
        );
    }

    pub async fn on_set_name(&mut self, connection_id: &ConnectionId, name: String) {
        let display_name = match DisplayName::new(name) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Ignoring setName from '{}': {}", connection_id, e);
                return;
            }
        };

        let now = Timestamp::new(self.clock.now_millis());
        let Some(transitions) = self
            .state
            .set_display_name(connection_id, display_name.clone(), now)
        else {
            tracing::debug!(
                "Ignoring setName from unknown connection '{}'",
                connection_id
            );
            return;
        };

        tracing::info!(
            "Connection '{}' is now '{}' in room '{}'",
            connection_id,
            display_name,
            self.state.id
        );
        self.broadcast_transitions(transitions).await;
        self.broadcast_online_users().await;
    }

    /// Upsert a message and echo the authoritative copy to every connection,
    /// sender included
    pub async fn on_upsert(
        &mut self,
        connection_id: &ConnectionId,
        kind: UpsertKind,
        message: ChatMessage,
    ) {
        if !self.state.is_connected(connection_id) {
            tracing::debug!(
                "Ignoring message '{}' from unknown connection '{}'",
                message.id.as_str(),
                connection_id
            );
            return;
        }

        let outcome = self.state.upsert_message(message.clone());
        tracing::debug!(
            "Message '{}' in room '{}': {:?}",
            message.id.as_str(),
            self.state.id,
            outcome
        );

        // 新規に追加された ID は受信側でも追加として扱えるよう add で返す
        let kind = match outcome {
            UpsertOutcome::Inserted => UpsertKind::Add,
            UpsertOutcome::Replaced | UpsertOutcome::Unchanged => kind,
        };
        self.broadcast(&RoomNotification::Upserted {
            kind,
            message: message.clone(),
        })
        .await;
        self.writer.enqueue(message);
    }

    /// Drop the connection. Unknown or already removed connections are a no-op.
    pub async fn on_disconnect(&mut self, connection_id: &ConnectionId) {
        let Some(transitions) = self.state.remove_connection(connection_id) else {
            tracing::debug!(
                "Connection '{}' already left room '{}'",
                connection_id,
                self.state.id
            );
            return;
        };
        self.pusher.unregister_client(connection_id).await;

        tracing::info!(
            "Connection '{}' left room '{}' ({} connections)",
            connection_id,
            self.state.id,
            self.state.connection_count()
        );
        self.broadcast_transitions(transitions).await;
        self.broadcast_online_users().await;
    }

    /// Leaves first, then joins
    async fn broadcast_transitions(&self, transitions: PresenceTransitions) {
        for user in transitions.leaves {
            self.broadcast(&RoomNotification::Presence {
                event: PresenceEvent::Leave,
                user,
            })
            .await;
        }
        for user in transitions.joins {
            self.broadcast(&RoomNotification::Presence {
                event: PresenceEvent::Join,
                user,
            })
            .await;
        }
    }

    async fn broadcast_online_users(&self) {
        self.broadcast(&RoomNotification::OnlineUsers(self.state.online_names()))
            .await;
    }

    async fn broadcast(&self, notification: &RoomNotification) {
        let targets = self.state.connection_ids();
        if let Err(e) = self.pusher.broadcast(targets, notification).await {
            tracing::warn!("Broadcast in room '{}' failed: {}", self.state.id, e);
        }
    }
}
