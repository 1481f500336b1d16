//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::ChatMessageDto;

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub online_users: Vec<String>,
    pub connection_count: usize,
    pub message_count: usize,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub online_users: Vec<String>,
    pub connection_count: usize,
    pub messages: Vec<ChatMessageDto>,
    /// RFC 3339
    pub created_at: String,
}

/// Answer of `GET /api/rooms/{room_id}/names/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAvailabilityDto {
    pub name: String,
    pub available: bool,
}
