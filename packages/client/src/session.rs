//! WebSocket client session management.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::{Sink, SinkExt, StreamExt};
use hiroba_server::{
    domain::Role,
    infrastructure::dto::websocket::{ChatMessageDto, InboundEvent, OutboundEvent},
};
use hiroba_shared::time::get_timestamp_millis;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    chat_log::{ChatLog, LogChange},
    domain::{InputCommand, parse_input, room_ws_url},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// State that outlives a single connection
pub struct SessionState {
    pub room: String,
    pub name: Arc<Mutex<String>>,
    pub log: ChatLog,
}

impl SessionState {
    pub fn new(room: String, name: String) -> Self {
        Self {
            room,
            name: Arc::new(Mutex::new(name)),
            log: ChatLog::new(),
        }
    }

    pub fn name(&self) -> String {
        lock(&self.name).clone()
    }

    fn set_name(&self, name: String) {
        *lock(&self.name) = name;
    }
}

fn lock(name: &Mutex<String>) -> MutexGuard<'_, String> {
    name.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run one connection to the room.
///
/// Returns `Ok(())` when the user closes input, an error when the connection
/// could not be established or was lost.
pub async fn run_client_session(
    base_url: &str,
    state: &mut SessionState,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = room_ws_url(base_url, &state.room);

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 400 => {
            return Err(ClientError::InvalidRoom(state.room.clone()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to {}", url);
    let (mut write, mut read) = ws_stream.split();

    // 再接続のたびに名前を名乗り直す
    send_event(
        &mut write,
        &InboundEvent::SetName { name: state.name() },
    )
    .await?;
    println!("{}", MessageFormatter::format_welcome(&state.room, &state.name()));

    loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => show_server_event(state, text.as_str()),
                    Some(Ok(Message::Binary(data))) => {
                        print!("{}", MessageFormatter::format_binary_message(data.len()));
                        redisplay_prompt(&state.name());
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionLost("closed by server".to_string()));
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionLost(e.to_string()));
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    Some(Ok(_)) => {}
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // User exit
                    let _ = write.close().await;
                    return Ok(());
                };
                handle_input(state, &mut write, &line).await?;
            }
        }
    }
}

async fn handle_input<S>(
    state: &mut SessionState,
    write: &mut S,
    line: &str,
) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    match parse_input(line) {
        None => {}
        Some(InputCommand::Send(content)) => {
            let message = ChatMessageDto {
                id: nanoid::nanoid!(8),
                content,
                user: state.name(),
                role: Role::User,
                timestamp: get_timestamp_millis(),
            };
            // サーバーからのエコーを待たずに手元へ反映する
            state.log.apply_local(message.clone());
            send_event(write, &InboundEvent::Add(message)).await?;
        }
        Some(InputCommand::Rename(name)) => {
            state.set_name(name.clone());
            send_event(write, &InboundEvent::SetName { name }).await?;
        }
        Some(InputCommand::Users) => {
            print!(
                "{}",
                MessageFormatter::format_users(state.log.online_users(), &state.name())
            );
            redisplay_prompt(&state.name());
        }
        Some(InputCommand::Help) => {
            print!("{}", MessageFormatter::format_help());
            redisplay_prompt(&state.name());
        }
    }
    Ok(())
}

async fn send_event<S>(write: &mut S, event: &InboundEvent) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::ConnectionError(format!("failed to encode event: {}", e)))?;
    write.send(Message::text(json)).await.map_err(|e| {
        tracing::warn!("Failed to send event: {}", e);
        ClientError::ConnectionLost(e.to_string())
    })
}

fn show_server_event(state: &mut SessionState, text: &str) {
    let event = match serde_json::from_str::<OutboundEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Unrecognized event: {}", e);
            print!("{}", MessageFormatter::format_raw_message(text));
            redisplay_prompt(&state.name());
            return;
        }
    };

    let presence = match &event {
        OutboundEvent::System { event, user } => Some((*event, user.clone())),
        _ => None,
    };

    let output = match state.log.apply(event) {
        LogChange::Reset => Some(MessageFormatter::format_history(state.log.messages())),
        LogChange::Appended(message) => Some(MessageFormatter::format_chat_message(&message)),
        LogChange::Replaced(message) => Some(MessageFormatter::format_edited_message(&message)),
        LogChange::Confirmed(_) | LogChange::Ignored | LogChange::Users => None,
        LogChange::Notice => {
            presence.map(|(event, user)| MessageFormatter::format_presence(event, &user))
        }
    };

    if let Some(output) = output {
        print!("{}", output);
        redisplay_prompt(&state.name());
    }
}
