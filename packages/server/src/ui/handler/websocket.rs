//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, ConnectionId, RoomId, UpsertKind},
    infrastructure::dto::websocket::InboundEvent,
    ui::state::AppState,
    usecase::{RoomEvent, RoomHandle},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> RoomId (Domain Model)
    let room_id = match RoomId::try_from(room_id.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id '{}': {}", room_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let room = match state.registry.get_or_create(&room_id).await {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Refusing connection to room '{}': {}", room_id, e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, room)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the coordinator drops the channel or the socket is closed.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Forward every decodable text frame to the room until the client goes away
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    room: RoomHandle,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", connection_id, text.as_str());
                    let Some(event) = decode_event(text.as_str()) else {
                        continue;
                    };
                    if room.send_event(connection_id.clone(), event).is_err() {
                        tracing::warn!("Room '{}' is gone", room.room_id());
                        break;
                    }
                }
                Message::Binary(_) => {
                    tracing::warn!("Ignoring binary frame from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, room: RoomHandle) {
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = room.connect(connection_id.clone(), tx) {
        tracing::error!("Failed to register '{}': {}", connection_id, e);
        return;
    }

    let (sender, receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receive_loop(receiver, room.clone(), connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = room.disconnect(connection_id.clone()) {
        tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
    }
}

/// Decode a text frame. Malformed frames are logged and dropped.
fn decode_event(text: &str) -> Option<RoomEvent> {
    let event = match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event: {}", e);
            return None;
        }
    };

    // DTO から Domain Model への変換
    let (kind, dto) = match event {
        InboundEvent::SetName { name } => return Some(RoomEvent::SetName(name)),
        InboundEvent::Add(dto) => (UpsertKind::Add, dto),
        InboundEvent::Update(dto) => (UpsertKind::Update, dto),
    };
    match ChatMessage::try_from(dto) {
        Ok(message) => Some(RoomEvent::Upsert { kind, message }),
        Err(e) => {
            tracing::warn!("Invalid message: {}", e);
            None
        }
    }
}
